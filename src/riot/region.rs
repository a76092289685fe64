use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Platform routing values (Summoner-v4, League-v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    BR1,
    LA1,
    LA2,
    NA1,
    JP1,
    KR,
    EUN1,
    EUW1,
    ME1,
    RU,
    TR1,
    OC1,
    PH2,
    SG2,
    TH2,
    TW2,
    VN2,
}

struct PlatformInfo {
    platform: Platform,
    host: &'static str,
    alias: &'static str,
    region: Region,
    display_name: &'static str,
}

#[rustfmt::skip]
const PLATFORMS: [PlatformInfo; 17] = [
    PlatformInfo { platform: Platform::BR1, host: "br1", alias: "BR", region: Region::Americas, display_name: "Brazil" },
    PlatformInfo { platform: Platform::LA1, host: "la1", alias: "LAN", region: Region::Americas, display_name: "Latin America North" },
    PlatformInfo { platform: Platform::LA2, host: "la2", alias: "LAS", region: Region::Americas, display_name: "Latin America South" },
    PlatformInfo { platform: Platform::NA1, host: "na1", alias: "NA", region: Region::Americas, display_name: "North America" },
    PlatformInfo { platform: Platform::JP1, host: "jp1", alias: "JP", region: Region::Asia, display_name: "Japan" },
    PlatformInfo { platform: Platform::KR, host: "kr", alias: "KR", region: Region::Asia, display_name: "Korea" },
    PlatformInfo { platform: Platform::EUN1, host: "eun1", alias: "EUNE", region: Region::Europe, display_name: "EU Nordic & East" },
    PlatformInfo { platform: Platform::EUW1, host: "euw1", alias: "EUW", region: Region::Europe, display_name: "EU West" },
    PlatformInfo { platform: Platform::ME1, host: "me1", alias: "ME", region: Region::Europe, display_name: "Middle East" },
    PlatformInfo { platform: Platform::RU, host: "ru", alias: "RU", region: Region::Europe, display_name: "Russia" },
    PlatformInfo { platform: Platform::TR1, host: "tr1", alias: "TR", region: Region::Europe, display_name: "Turkey" },
    PlatformInfo { platform: Platform::OC1, host: "oc1", alias: "OCE", region: Region::Sea, display_name: "Oceania" },
    PlatformInfo { platform: Platform::PH2, host: "ph2", alias: "PH", region: Region::Sea, display_name: "Philippines" },
    PlatformInfo { platform: Platform::SG2, host: "sg2", alias: "SG", region: Region::Sea, display_name: "Singapore" },
    PlatformInfo { platform: Platform::TH2, host: "th2", alias: "TH", region: Region::Sea, display_name: "Thailand" },
    PlatformInfo { platform: Platform::TW2, host: "tw2", alias: "TW", region: Region::Sea, display_name: "Taiwan" },
    PlatformInfo { platform: Platform::VN2, host: "vn2", alias: "VN", region: Region::Sea, display_name: "Vietnam" },
];

impl Platform {
    fn info(self) -> &'static PlatformInfo {
        // The table holds every variant in declaration order.
        &PLATFORMS[self as usize]
    }

    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        self.info().host
    }

    pub fn to_region(self) -> Region {
        self.info().region
    }

    pub fn display_name(&self) -> &'static str {
        self.info().display_name
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        PLATFORMS
            .iter()
            .find(|info| {
                wanted.eq_ignore_ascii_case(info.host) || wanted.eq_ignore_ascii_case(info.alias)
            })
            .map(|info| info.platform)
            .or(match wanted.to_uppercase().as_str() {
                "EUN" => Some(Platform::EUN1),
                "OC" => Some(Platform::OC1),
                _ => None,
            })
            .ok_or_else(|| AppError::InvalidPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Regional routing values (Account-v1, Match-v5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Americas,
    Asia,
    Europe,
    Sea,
}

impl Region {
    pub fn base_url(&self) -> String {
        format!("https://{}.api.riotgames.com", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Americas => "americas",
            Self::Asia => "asia",
            Self::Europe => "europe",
            Self::Sea => "sea",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
