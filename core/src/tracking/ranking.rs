use crate::tracking::status::Status;
use std::cmp::Ordering;

fn compare(lhs: &Status, rhs: &Status) -> Ordering {
    match (lhs, rhs) {
        (
            Status::Travelling {
                distance_remaining_km: a,
            },
            Status::Travelling {
                distance_remaining_km: b,
            },
        ) => match (a.is_nan(), b.is_nan()) {
            (false, false) => a.total_cmp(b),
            // NaN of either sign goes after every real distance.
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        },
        (Status::Travelling { .. }, Status::Arrived { .. }) => Ordering::Less,
        (Status::Arrived { .. }, Status::Travelling { .. }) => Ordering::Greater,
        (Status::Arrived { arrived_at: a }, Status::Arrived { arrived_at: b }) => a.cmp(b),
    }
}

/// Orders keys for display: travelling entities by remaining distance,
/// then arrived entities by arrival time. Exact ties keep input order, which
/// for tracks from `build_tracks` is ascending key order.
pub fn rank<K, I>(statuses: I) -> Vec<K>
where
    I: IntoIterator<Item = (K, Status)>,
{
    let mut entries: Vec<(K, Status)> = statuses.into_iter().collect();
    entries.sort_by(|(_, lhs), (_, rhs)| compare(lhs, rhs));
    entries.into_iter().map(|(key, _)| key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{distance_km, Position};
    use crate::report::fixtures::at;

    fn travelling(km: f64) -> Status {
        Status::Travelling {
            distance_remaining_km: km,
        }
    }

    fn arrived(seconds: i64) -> Status {
        Status::Arrived {
            arrived_at: at(seconds),
        }
    }

    #[test]
    fn moving_entity_ranks_before_arrived_one() {
        let now = 10_000;
        let statuses = vec![("early", arrived(now - 3600)), ("moving", travelling(5.0))];
        assert_eq!(rank(statuses), vec!["moving", "early"]);

        let statuses = vec![("moving", travelling(5.0)), ("early", arrived(now - 3600))];
        assert_eq!(rank(statuses), vec!["moving", "early"]);
    }

    #[test]
    fn total_order_across_both_kinds() {
        let statuses = vec![
            ("d", arrived(300)),
            ("a", travelling(12.5)),
            ("e", arrived(100)),
            ("b", travelling(0.0)),
            ("c", travelling(3.2)),
        ];
        assert_eq!(rank(statuses), vec!["b", "c", "a", "e", "d"]);
    }

    #[test]
    fn exact_ties_preserve_input_order() {
        let statuses = vec![
            ("z", travelling(4.0)),
            ("y", travelling(4.0)),
            ("x", arrived(50)),
            ("w", arrived(50)),
        ];
        assert_eq!(rank(statuses), vec!["z", "y", "x", "w"]);
    }

    #[test]
    fn nan_distance_sorts_last_among_travelling() {
        let statuses = vec![
            ("nan", travelling(f64::NAN)),
            ("arrived", arrived(1)),
            ("far", travelling(900.0)),
        ];
        assert_eq!(rank(statuses), vec!["far", "nan", "arrived"]);
    }

    #[test]
    fn negative_and_computed_nan_also_sort_after_finite_distances() {
        let computed = distance_km(
            &Position::new(f64::INFINITY, 0.0),
            &Position::new(51.0, 5.0),
        );
        assert!(computed.is_nan());

        let statuses = vec![
            ("computed", travelling(computed)),
            ("negative", travelling(-f64::NAN)),
            ("far", travelling(900.0)),
            ("near", travelling(0.5)),
            ("arrived", arrived(1)),
        ];
        assert_eq!(
            rank(statuses),
            vec!["near", "far", "computed", "negative", "arrived"]
        );
    }

    #[test]
    fn empty_input_yields_empty_order() {
        let ranked: Vec<&str> = rank(Vec::new());
        assert!(ranked.is_empty());
    }
}
