/// (cgpa 下限, iq 下限)，由高到低依序比對，第一個符合即錄取
pub const PLACEMENT_RULES: [(f64, f64); 3] = [(8.0, 120.0), (7.0, 110.0), (6.5, 100.0)];

pub fn rule_based_placement(academic_score: f64, aptitude_score: f64) -> bool {
    PLACEMENT_RULES
        .iter()
        .any(|&(min_academic, min_aptitude)| {
            academic_score >= min_academic && aptitude_score >= min_aptitude
        })
}

/// 回傳第一個符合的規則索引，用於除錯日誌
pub fn matching_rule(academic_score: f64, aptitude_score: f64) -> Option<usize> {
    PLACEMENT_RULES
        .iter()
        .position(|&(min_academic, min_aptitude)| {
            academic_score >= min_academic && aptitude_score >= min_aptitude
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_rule_places() {
        for academic in [8.0, 8.5, 9.9, 10.0] {
            for aptitude in [120.0, 150.0, 200.0] {
                assert!(rule_based_placement(academic, aptitude));
            }
        }
    }

    #[test]
    fn test_middle_rule_places() {
        for academic in [7.0, 7.4, 7.99, 9.0] {
            for aptitude in [110.0, 115.0, 119.0, 180.0] {
                assert!(rule_based_placement(academic, aptitude));
            }
        }
    }

    #[test]
    fn test_bottom_rule_places() {
        for academic in [6.5, 6.9, 8.0] {
            for aptitude in [100.0, 105.0, 109.9, 200.0] {
                assert!(rule_based_placement(academic, aptitude));
            }
        }
    }

    #[test]
    fn test_low_scores_not_placed() {
        assert!(!rule_based_placement(6.0, 90.0));
        assert!(!rule_based_placement(6.49, 200.0));
        assert!(!rule_based_placement(0.0, 50.0));
    }

    #[test]
    fn test_aptitude_just_below_threshold() {
        // 8.0/119 不符合第一條，但會落到第二條
        assert_ne!(matching_rule(8.0, 119.0), Some(0));
        assert_eq!(matching_rule(8.0, 119.0), Some(1));
        assert!(rule_based_placement(8.0, 119.0));

        assert!(!rule_based_placement(6.5, 99.0));
        assert!(!rule_based_placement(9.5, 99.0));
        assert_eq!(matching_rule(9.5, 99.0), None);
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(matching_rule(9.0, 130.0), Some(0));
        assert_eq!(matching_rule(7.2, 112.0), Some(1));
        assert_eq!(matching_rule(6.6, 101.0), Some(2));
    }

    #[test]
    fn test_deterministic() {
        let first = rule_based_placement(7.3, 111.0);
        for _ in 0..100 {
            assert_eq!(rule_based_placement(7.3, 111.0), first);
        }
    }
}
