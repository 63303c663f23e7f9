//! Expense distribution at submission time.

use crate::{DistributionEntry, EngineError, Group, MoneyCents, ResultEngine};

/// Computes the distribution entries for a new or edited expense.
///
/// - Single-member group: one entry for `viewer_id` with the full amount.
/// - `split_equally`: every member, payer included, owes `amount / 2`. The
///   divisor stays 2 whatever the group size, so for groups larger than two
///   the entries add up to more than `amount`.
/// - Otherwise: one entry with the full amount for the first member who is
///   not the payer.
///
/// Fails with [`EngineError::InvalidAmount`] for non-positive amounts and
/// with [`EngineError::LookupFailure`] when the payer is not in the group or
/// a one-sided split finds nobody to charge.
pub fn compute_split(
    amount: MoneyCents,
    payer_id: &str,
    group: &Group,
    split_equally: bool,
    viewer_id: &str,
) -> ResultEngine<Vec<DistributionEntry>> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!(
            "expense amount must be > 0, got {amount}"
        )));
    }
    if !group.has_member(payer_id) {
        return Err(EngineError::LookupFailure(format!(
            "payer '{payer_id}' is not a member of group '{}'",
            group.id()
        )));
    }

    if group.is_solo() {
        return Ok(vec![DistributionEntry::new(viewer_id, amount)]);
    }

    if split_equally {
        let share = amount.half();
        return Ok(group
            .members()
            .iter()
            .map(|member| DistributionEntry::new(member.id.as_str(), share))
            .collect());
    }

    let debtor = group
        .members()
        .iter()
        .find(|member| member.id != payer_id)
        .ok_or_else(|| {
            EngineError::LookupFailure(format!(
                "no member other than payer '{payer_id}' in group '{}'",
                group.id()
            ))
        })?;
    Ok(vec![DistributionEntry::new(debtor.id.as_str(), amount)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Member;

    fn group(ids: &[&str]) -> Group {
        Group::new(
            "g1",
            "Group",
            ids.iter().map(|id| Member::new(*id, id.to_uppercase())).collect(),
        )
        .unwrap()
    }

    #[test]
    fn solo_group_charges_the_viewer_not_the_payer() {
        let solo = group(&["u1"]);
        let dist = compute_split(MoneyCents::new(1500), "u1", &solo, true, "viewer").unwrap();
        assert_eq!(dist, vec![DistributionEntry::new("viewer", MoneyCents::new(1500))]);
    }

    #[test]
    fn equal_split_between_two_members() {
        let g = group(&["u1", "u2"]);
        for payer in ["u1", "u2"] {
            let dist = compute_split(MoneyCents::new(3000), payer, &g, true, "u1").unwrap();
            assert_eq!(
                dist,
                vec![
                    DistributionEntry::new("u1", MoneyCents::new(1500)),
                    DistributionEntry::new("u2", MoneyCents::new(1500)),
                ]
            );
        }
    }

    #[test]
    fn equal_split_in_larger_group_still_halves() {
        let g = group(&["u1", "u2", "u3"]);
        let dist = compute_split(MoneyCents::new(3000), "u2", &g, true, "u1").unwrap();
        assert_eq!(dist.len(), 3);
        assert!(dist.iter().all(|e| e.amount == MoneyCents::new(1500)));
        let total: MoneyCents = dist.iter().map(|e| e.amount).sum();
        assert_ne!(total, MoneyCents::new(3000));
    }

    #[test]
    fn one_sided_split_charges_first_non_payer() {
        let g = group(&["u1", "u2", "u3"]);
        let dist = compute_split(MoneyCents::new(900), "u1", &g, false, "u1").unwrap();
        assert_eq!(dist, vec![DistributionEntry::new("u2", MoneyCents::new(900))]);

        let dist = compute_split(MoneyCents::new(900), "u2", &g, false, "u1").unwrap();
        assert_eq!(dist, vec![DistributionEntry::new("u1", MoneyCents::new(900))]);
    }

    #[test]
    fn one_sided_split_without_other_member_fails() {
        let dup = Group::new(
            "g9",
            "Dup",
            vec![Member::new("u1", "A"), Member::new("u1", "A again")],
        )
        .unwrap();
        let err = compute_split(MoneyCents::new(100), "u1", &dup, false, "u1").unwrap_err();
        assert!(matches!(err, EngineError::LookupFailure(_)));
    }

    #[test]
    fn payer_outside_group_fails() {
        let g = group(&["u1", "u2"]);
        let err = compute_split(MoneyCents::new(100), "u9", &g, true, "u1").unwrap_err();
        assert!(matches!(err, EngineError::LookupFailure(_)));
    }

    #[test]
    fn non_positive_amount_fails() {
        let g = group(&["u1", "u2"]);
        assert!(matches!(
            compute_split(MoneyCents::ZERO, "u1", &g, true, "u1"),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
