//! 面试阶段与角色的静态配置
//!
//! 阶段建模为带序的枚举，转移在编译期穷尽；每个阶段携带固定问题列表与一个
//! 评估/生成用的角色（persona）。会话进行中只读。

/// 评估与生成所用的角色：名字、职位与 system prompt
#[derive(Debug)]
pub struct Agent {
    pub name: &'static str,
    pub role: &'static str,
    pub system_prompt: &'static str,
}

pub const RECRUITER: Agent = Agent {
    name: "Recruiter Sarah",
    role: "HR Recruiter",
    system_prompt: "You are Sarah, a friendly and professional HR recruiter for Worldcoin.\n\
        Your goal is to make candidates comfortable while evaluating their potential.\n\
        Communicate in Bahasa Indonesia with a warm, encouraging tone.",
};

pub const TECHNICAL_EXPERT: Agent = Agent {
    name: "Tech Expert Budi",
    role: "Technical Specialist",
    system_prompt: "You are Budi, a technical expert for Worldcoin operations.\n\
        Evaluate understanding of Worldcoin, World ID, and Orb technology.\n\
        Communicate clearly in Bahasa Indonesia.",
};

pub const HR_SPECIALIST: Agent = Agent {
    name: "CS Expert Nina",
    role: "HR Specialist",
    system_prompt: "You are Nina, focusing on soft skills and cultural fit.\n\
        Evaluate communication skills and service orientation.\n\
        Maintain a professional yet friendly tone in Bahasa Indonesia.",
};

/// 面试阶段，严格按 Initial → Technical → Hr 前进，不回退
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Initial,
    Technical,
    Hr,
}

impl Stage {
    /// 会话起始阶段
    pub const FIRST: Stage = Stage::Initial;

    /// 本阶段的固定问题列表
    pub fn questions(&self) -> &'static [&'static str] {
        match self {
            Stage::Initial => &[
                "Apakah Anda memiliki pengalaman sebelumnya sebagai sales promoter atau di bidang hospitality?",
                "Apakah Anda bersedia bekerja dalam shift 12 jam?",
                "Bagaimana Anda menangani situasi ketika harus menjelaskan konsep yang kompleks kepada pelanggan?",
            ],
            Stage::Technical => &[
                "Apa yang Anda ketahui tentang Worldcoin dan tujuannya?",
                "Bagaimana Anda akan menjelaskan konsep World ID kepada pengguna yang awam dengan teknologi?",
                "Apa yang Anda ketahui tentang proses verifikasi menggunakan Orb?",
            ],
            Stage::Hr => &[
                "Bagaimana Anda menangani situasi ketika ada pelanggan yang tidak sabar?",
                "Ceritakan pengalaman Anda bekerja dalam tim dan bagaimana Anda berkontribusi?",
                "Bagaimana Anda menjaga semangat dan energi positif selama shift kerja yang panjang?",
            ],
        }
    }

    /// 本阶段的评估角色
    pub fn agent(&self) -> &'static Agent {
        match self {
            Stage::Initial => &RECRUITER,
            Stage::Technical => &TECHNICAL_EXPERT,
            Stage::Hr => &HR_SPECIALIST,
        }
    }

    /// 下一阶段；最后一阶段返回 None
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Initial => Some(Stage::Technical),
            Stage::Technical => Some(Stage::Hr),
            Stage::Hr => None,
        }
    }
}
