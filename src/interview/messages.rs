//! 固定的用户可见文案（印尼语）与公司信息
//!
//! 所有失败路径都有对应回复，沉默只出现在问答收集的有意不回复。

/// 开场白：介绍流程并索要邮箱
pub const WELCOME: &str = "Selamat datang di proses interview Worldcoin! 👋\n\n\
*Posisi: Operation Staff - Worldcoin Project*\n\n\
Proses interview akan terdiri dari 3 tahap:\n\
1. Screening Awal\n\
2. Pengetahuan Teknis\n\
3. Soft Skills & Customer Service\n\n\
*Informasi Penting:*\n\
• Interview berlangsung sekitar 15-20 menit\n\
• Total 9 pertanyaan (3 per tahap)\n\
• Jawablah dengan jelas dan detail\n\
• Gunakan Bahasa Indonesia\n\n\
*Tips Interview:*\n\
✨ Berikan contoh pengalaman nyata\n\
✨ Jelaskan dengan detail namun ringkas\n\
✨ Tanyakan jika ada yang kurang jelas\n\n\
Sebelum kita mulai, mohon berikan alamat email Anda untuk keperluan komunikasi lebih lanjut:";

pub const ASK_NAME: &str = "Terima kasih. Mohon berikan nama lengkap Anda:";

/// 邮箱格式不合法时的重试提示（校验重试，不是错误）
pub const INVALID_EMAIL: &str =
    "Mohon masukkan alamat email yang valid (contoh: nama@email.com)";

/// 阶段间问答窗口的邀请语
pub const ASK_QUESTIONS: &str =
    "Ada yang ingin ditanyakan? Atau ketik 'LANJUT' untuk melanjutkan ke tahap berikutnya 😊";

/// 问答窗口的继续关键词（大小写不敏感）
pub const CONTINUE_KEYWORD: &str = "lanjut";

pub const SESSION_EXPIRED: &str =
    "Sesi interview telah berakhir karena timeout. Silakan mulai ulang.";

/// Router 捕获错误后的统一道歉回复
pub const GENERIC_APOLOGY: &str =
    "Maaf, terjadi kesalahan. Silakan coba beberapa saat lagi.";

/// 单消息处理超时的专用回复（与 GENERIC_APOLOGY 区分）
pub const TIMEOUT_REPLY: &str =
    "Maaf, respons membutuhkan waktu lebih lama dari biasanya. Silakan coba lagi.";

/// 批量问答回复末尾的固定引导
pub const BATCH_FOOTER: &str =
    "Ketik *LANJUT* untuk melanjutkan interview, atau tanyakan hal lain yang ingin kamu ketahui 😊";

/// 批量问答生成失败时的兜底回复
pub const BATCH_FALLBACK: &str =
    "Mohon maaf, ada kendala teknis. Ketik *LANJUT* untuk melanjutkan interview.";

/// 通过且成功预约时的结束语
pub fn final_passed_with_link(score: f64, verdict: &str, email: &str, link: &str) -> String {
    format!(
        "🎉 Interview Selesai!\n\n\
Hasil evaluasi Anda:\n\
📊 Nilai Rata-rata: {:.1}/10\n\
✨ Hasil: {}\n\n\
Selamat! Anda telah lolos tahap awal.\n\
Jadwal interview lanjutan dengan tim HR telah dikirim ke email {}\n\
Link Meeting: {}\n\n\
Sampai bertemu! 🌟",
        score, verdict, email, link
    )
}

/// 通过但预约失败时的结束语（预约失败绝不中断收尾）
pub fn final_passed_fallback(score: f64, verdict: &str) -> String {
    format!(
        "🎉 Interview Selesai!\n\n\
Hasil evaluasi Anda:\n\
📊 Nilai Rata-rata: {:.1}/10\n\
✨ Hasil: {}\n\n\
Selamat! Tim HR kami akan menghubungi Anda dalam 2-3 hari kerja untuk interview lanjutan.\n\n\
Semoga sukses! 🌟",
        score, verdict
    )
}

/// 未达及格线时的结束语
pub fn final_failed(score: f64, verdict: &str) -> String {
    format!(
        "🎉 Interview Selesai!\n\n\
Hasil evaluasi Anda:\n\
📊 Nilai Rata-rata: {:.1}/10\n\
✨ Hasil: {}\n\n\
Terima kasih atas partisipasi Anda. Sayangnya, kualifikasi belum sesuai.\n\n\
Semoga sukses! 🌟",
        score, verdict
    )
}

/// 公司信息，注入批量问答 prompt
pub fn company_profile() -> serde_json::Value {
    serde_json::json!({
        "industry": "Technology & Digital Identity Services",
        "headquarters": "South Tangerang, Banten, Indonesia",
        "overview": "Koru Indonesia is a technology-driven company specializing in digital identity verification and operational management. We collaborate with global technology projects to provide seamless onboarding experiences for users. Currently, we are partnering with the Worldcoin Project to facilitate user verification at designated activation sites across Indonesia.",
        "mission": "We aim to revolutionize digital identity verification by delivering secure, efficient, and user-friendly solutions. Our commitment is to provide top-tier operational excellence while ensuring an inclusive and accessible experience for all users.",
        "services": [
            "Operational Management: We manage and oversee Worldcoin verification centers, ensuring smooth daily operations.",
            "User Onboarding: We facilitate the identity verification process, helping users understand and participate in the Worldcoin ecosystem.",
            "Team Development: We train and empower our team members to deliver high-quality customer service and technical support."
        ],
        "benefits": [
            "Competitive salary with KPI-based performance bonuses",
            "A dynamic work environment with career growth opportunities",
            "Hands-on experience with cutting-edge technology in digital identity verification",
            "A friendly and professional team committed to excellence"
        ],
        "locations": {
            "bintaro": {
                "name": "World: Pusat Verifikasi (Bintaro)",
                "address": "12 Rengas Raya Street, RT.05/RW.09, Rengas, East Ciputat, South Tangerang, Banten 15412, Indonesia"
            },
            "gadingSerpong": {
                "name": "World: Pusat Verifikasi (Gading Serpong)",
                "address": "M9-10 Madison Grande, Boulevard Diponegoro Street, Gading, Serpong, Tangerang, Banten 15334, Indonesia"
            }
        }
    })
}
