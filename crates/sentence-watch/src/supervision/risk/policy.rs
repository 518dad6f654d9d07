use super::super::domain::RiskLevel;
use super::config::RiskConfig;
use super::RiskFactor;

pub(crate) fn level_for(score: f64, config: &RiskConfig) -> RiskLevel {
    if score < config.medium_threshold {
        RiskLevel::Low
    } else if score < config.high_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

const fn base_recommendations(level: RiskLevel) -> [&'static str; 3] {
    match level {
        RiskLevel::High => [
            "Tăng cường giám sát",
            "Báo cáo định kỳ hàng tuần",
            "Kiểm tra nơi cư trú thường xuyên",
        ],
        RiskLevel::Medium => [
            "Giám sát định kỳ",
            "Báo cáo hàng tháng",
            "Hỗ trợ tìm việc làm",
        ],
        RiskLevel::Low => [
            "Giám sát thông thường",
            "Báo cáo hàng quý",
            "Khuyến khích tham gia cải tạo",
        ],
    }
}

/// Level-keyed base list followed by factor-specific additions. Not deduplicated.
pub(crate) fn recommendations(level: RiskLevel, fired: &[RiskFactor]) -> Vec<String> {
    let mut recommendations: Vec<String> = base_recommendations(level)
        .iter()
        .map(|item| item.to_string())
        .collect();

    let additions = [
        (RiskFactor::Unemployed, "Hỗ trợ tìm việc làm"),
        (RiskFactor::YoungAge, "Hướng dẫn kỹ năng sống"),
        (RiskFactor::ExpiringSoon, "Chuẩn bị hồ sơ hoàn thành"),
    ];
    for (factor, recommendation) in additions {
        if fired.contains(&factor) {
            recommendations.push(recommendation.to_string());
        }
    }

    recommendations
}
