//! Offside lines
//!
//! Canonical frame: 우리 팀은 +x 로 공격.
//! - `their_offside_line_x`: 상대 수비의 두 번째 마지막 선수 (우리 공격 기준, +x 쪽)
//! - `our_offside_line_x`: 우리 수비의 두 번째 마지막 선수 (상대 공격 기준, -x 쪽)
//!
//! 선수가 2명 미만이면 baseline 0.0 (하프라인). 오프사이드는 상대 진영에서만
//! 성립하므로 라인은 하프라인보다 뒤로 물러나지 않는다.

/// Baseline used when fewer than two defenders are known.
pub const BASELINE_X: f64 = 0.0;

/// Offside line against an attack toward +x, from the defenders' x coordinates.
///
/// Second-highest x, never behind the halfway line.
pub fn offside_line_for_attack_toward_positive<I>(defender_xs: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut xs: Vec<f64> = defender_xs.into_iter().filter(|x| x.is_finite()).collect();
    if xs.len() < 2 {
        return BASELINE_X;
    }
    xs.sort_by(|a, b| b.total_cmp(a));
    xs[1].max(BASELINE_X)
}

/// Mirror of [`offside_line_for_attack_toward_positive`] for an attack toward -x.
pub fn offside_line_for_attack_toward_negative<I>(defender_xs: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut xs: Vec<f64> = defender_xs.into_iter().filter(|x| x.is_finite()).collect();
    if xs.len() < 2 {
        return BASELINE_X;
    }
    xs.sort_by(|a, b| a.total_cmp(b));
    xs[1].min(BASELINE_X)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_highest_defender() {
        assert_eq!(offside_line_for_attack_toward_positive([10.0, 30.0, 5.0]), 10.0);
    }

    #[test]
    fn test_fewer_than_two_is_baseline() {
        assert_eq!(offside_line_for_attack_toward_positive([10.0]), 0.0);
        assert_eq!(offside_line_for_attack_toward_positive(std::iter::empty()), 0.0);
        assert_eq!(offside_line_for_attack_toward_negative([-10.0]), 0.0);
    }

    #[test]
    fn test_line_never_behind_halfway() {
        // defenders pushed deep into the attacker's own half
        assert_eq!(offside_line_for_attack_toward_positive([-5.0, -20.0, -2.0]), 0.0);
        assert_eq!(offside_line_for_attack_toward_negative([5.0, 20.0]), 0.0);
    }

    #[test]
    fn test_negative_direction_uses_second_minimum() {
        assert_eq!(offside_line_for_attack_toward_negative([-50.0, -30.0, -10.0]), -30.0);
    }

    #[test]
    fn test_goalie_does_not_set_the_line() {
        // goalie at 50.0 is the last defender, the line is the next one
        let xs = [50.0, 35.5, 20.0, 34.0];
        assert_eq!(offside_line_for_attack_toward_positive(xs), 35.5);
    }
}
