// src/region.rs
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Code of the row that carries country-wide totals.
pub const NATIONAL_CODE: &str = "전국";

/// Sejong reports `-` instead of numbers for the years before it existed.
pub const SEJONG_CODE: &str = "세종";

/// The eighteen region codes found in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Region {
    Seoul,
    Busan,
    Daegu,
    Incheon,
    Gwangju,
    Daejeon,
    Ulsan,
    Sejong,
    Gyeonggi,
    Gangwon,
    Chungbuk,
    Chungnam,
    Jeonbuk,
    Jeonnam,
    Gyeongbuk,
    Gyeongnam,
    Jeju,
    National,
}

impl Region {
    pub const ALL: [Region; 18] = [
        Region::Seoul,
        Region::Busan,
        Region::Daegu,
        Region::Incheon,
        Region::Gwangju,
        Region::Daejeon,
        Region::Ulsan,
        Region::Sejong,
        Region::Gyeonggi,
        Region::Gangwon,
        Region::Chungbuk,
        Region::Chungnam,
        Region::Jeonbuk,
        Region::Jeonnam,
        Region::Gyeongbuk,
        Region::Gyeongnam,
        Region::Jeju,
        Region::National,
    ];

    /// Korean code as it appears in the region column.
    pub fn code(self) -> &'static str {
        match self {
            Region::Seoul => "서울",
            Region::Busan => "부산",
            Region::Daegu => "대구",
            Region::Incheon => "인천",
            Region::Gwangju => "광주",
            Region::Daejeon => "대전",
            Region::Ulsan => "울산",
            Region::Sejong => SEJONG_CODE,
            Region::Gyeonggi => "경기",
            Region::Gangwon => "강원",
            Region::Chungbuk => "충북",
            Region::Chungnam => "충남",
            Region::Jeonbuk => "전북",
            Region::Jeonnam => "전남",
            Region::Gyeongbuk => "경북",
            Region::Gyeongnam => "경남",
            Region::Jeju => "제주",
            Region::National => NATIONAL_CODE,
        }
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Region::Seoul => "Seoul",
            Region::Busan => "Busan",
            Region::Daegu => "Daegu",
            Region::Incheon => "Incheon",
            Region::Gwangju => "Gwangju",
            Region::Daejeon => "Daejeon",
            Region::Ulsan => "Ulsan",
            Region::Sejong => "Sejong",
            Region::Gyeonggi => "Gyeonggi",
            Region::Gangwon => "Gangwon",
            Region::Chungbuk => "Chungbuk",
            Region::Chungnam => "Chungnam",
            Region::Jeonbuk => "Jeonbuk",
            Region::Jeonnam => "Jeonnam",
            Region::Gyeongbuk => "Gyeongbuk",
            Region::Gyeongnam => "Gyeongnam",
            Region::Jeju => "Jeju",
            Region::National => "National",
        }
    }

    pub fn from_code(code: &str) -> Option<Region> {
        BY_CODE.get(code.trim()).copied()
    }
}

static BY_CODE: Lazy<HashMap<&'static str, Region>> =
    Lazy::new(|| Region::ALL.iter().map(|r| (r.code(), *r)).collect());

/// Display name for a raw region code; `None` for codes outside the map.
pub fn display_name(code: &str) -> Option<&'static str> {
    Region::from_code(code).map(Region::name)
}

/// Name to show for a region code, falling back to the code itself.
pub fn label(code: &str) -> &str {
    display_name(code).unwrap_or(code)
}

pub fn is_national(code: &str) -> bool {
    code.trim() == NATIONAL_CODE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_has_eighteen_unique_entries() {
        assert_eq!(BY_CODE.len(), 18);
        for region in Region::ALL {
            assert_eq!(Region::from_code(region.code()), Some(region));
        }
    }

    #[test]
    fn unknown_codes_have_no_display_name() {
        assert_eq!(display_name("서울"), Some("Seoul"));
        assert_eq!(display_name("전국"), Some("National"));
        assert_eq!(display_name("Atlantis"), None);
        assert_eq!(label("Atlantis"), "Atlantis");
    }

    #[test]
    fn national_code_is_recognised() {
        assert!(is_national(" 전국 "));
        assert_eq!(Region::from_code(NATIONAL_CODE), Some(Region::National));
        assert!(!is_national("세종"));
    }
}
