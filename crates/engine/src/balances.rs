//! Net balances between the viewer and the other members.
//!
//! Sign convention for the running balance kept per counterpart:
//! - negative: the counterpart owes the viewer
//! - positive: the viewer owes the counterpart
//!
//! Zero balances are dropped from the output.

use std::{collections::HashMap, fmt};

use crate::{EngineError, Expense, MoneyCents, NameLookup, ResultEngine};

/// Line returned when nobody owes anybody anything.
pub const ALL_SETTLED: &str = "All debts are settled.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    OwesYou,
    YouOwe,
}

/// One non-zero net balance, ready to print.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceStatement {
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub direction: Direction,
    /// Always positive.
    pub amount: MoneyCents,
}

impl fmt::Display for BalanceStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::OwesYou => write!(f, "{} owes you {}", self.counterpart_name, self.amount),
            Direction::YouOwe => write!(f, "You owe {} {}", self.counterpart_name, self.amount),
        }
    }
}

/// Result of netting a set of expenses for one viewer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settlement {
    pub statements: Vec<BalanceStatement>,
}

impl Settlement {
    pub fn is_settled(&self) -> bool {
        self.statements.is_empty()
    }

    /// Printable lines; [`ALL_SETTLED`] alone when there is nothing to settle.
    pub fn lines(&self) -> Vec<String> {
        if self.is_settled() {
            return vec![ALL_SETTLED.to_string()];
        }
        self.statements.iter().map(ToString::to_string).collect()
    }
}

/// Running balances keyed by counterpart, in first-encounter order.
#[derive(Default)]
struct Ledger {
    index: HashMap<String, usize>,
    balances: Vec<(String, MoneyCents)>,
}

impl Ledger {
    fn adjust(&mut self, member_id: &str, delta: MoneyCents) -> ResultEngine<()> {
        let slot = match self.index.get(member_id) {
            Some(&slot) => slot,
            None => {
                self.balances.push((member_id.to_string(), MoneyCents::ZERO));
                let slot = self.balances.len() - 1;
                self.index.insert(member_id.to_string(), slot);
                slot
            }
        };
        let balance = &mut self.balances[slot].1;
        *balance = balance
            .checked_add(delta)
            .ok_or_else(|| out_of_range(member_id))?;
        Ok(())
    }
}

fn out_of_range(member_id: &str) -> EngineError {
    EngineError::InvalidAmount(format!("balance with {member_id} is out of range"))
}

/// Signed net balance per counterpart, in first-encounter order. Zero
/// balances are kept here; [`compute_balances`] drops them.
pub fn net_balances(
    expenses: &[Expense],
    viewer_id: &str,
) -> ResultEngine<Vec<(String, MoneyCents)>> {
    let mut ledger = Ledger::default();

    for expense in expenses {
        if expense.payer_id == viewer_id {
            for entry in &expense.distribution {
                if entry.member_id != viewer_id {
                    let delta = entry
                        .amount
                        .checked_neg()
                        .ok_or_else(|| out_of_range(&entry.member_id))?;
                    ledger.adjust(&entry.member_id, delta)?;
                }
            }
        } else {
            let owed = expense.owed_by(viewer_id).unwrap_or(MoneyCents::ZERO);
            ledger.adjust(&expense.payer_id, owed)?;
        }
    }

    Ok(ledger.balances)
}

/// Nets `expenses` from the point of view of `viewer_id` and renders one
/// statement per counterpart with a non-zero balance.
///
/// Names come from `names`; unknown ids are shown as-is. Callers should skip
/// single-member groups.
pub fn compute_balances<N>(
    expenses: &[Expense],
    viewer_id: &str,
    names: &N,
) -> ResultEngine<Settlement>
where
    N: NameLookup + ?Sized,
{
    let statements = net_balances(expenses, viewer_id)?
        .into_iter()
        .filter(|(_, balance)| !balance.is_zero())
        .map(|(member_id, balance)| {
            let counterpart_name = names
                .name_of(&member_id)
                .unwrap_or(member_id.as_str())
                .to_string();
            let direction = if balance.is_negative() {
                Direction::OwesYou
            } else {
                Direction::YouOwe
            };
            let amount = balance
                .checked_abs()
                .ok_or_else(|| out_of_range(&member_id))?;
            Ok(BalanceStatement {
                counterpart_id: member_id,
                counterpart_name,
                direction,
                amount,
            })
        })
        .collect::<ResultEngine<Vec<_>>>()?;

    Ok(Settlement { statements })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::DistributionEntry;

    fn paid(payer: &str, entries: &[(&str, i64)]) -> Expense {
        Expense {
            id: format!("{payer}-{}", entries.len()),
            amount: MoneyCents::new(entries.iter().map(|(_, c)| c).sum()),
            description: "x".to_string(),
            date: Utc::now(),
            category: "misc".to_string(),
            payer_id: payer.to_string(),
            group_id: "g1".to_string(),
            distribution: entries
                .iter()
                .map(|(m, c)| DistributionEntry::new(*m, MoneyCents::new(*c)))
                .collect(),
        }
    }

    fn no_names() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn viewer_paid_counterpart_owes() {
        let expenses = vec![paid("U1", &[("U2", 2000)])];
        let settlement = compute_balances(&expenses, "U1", &no_names()).unwrap();
        assert_eq!(settlement.lines(), vec!["U2 owes you $20.00".to_string()]);
        assert_eq!(settlement.statements[0].direction, Direction::OwesYou);
    }

    #[test]
    fn counterpart_paid_viewer_owes() {
        let expenses = vec![paid("U2", &[("U1", 2000)])];
        let settlement = compute_balances(&expenses, "U1", &no_names()).unwrap();
        assert_eq!(settlement.lines(), vec!["You owe U2 $20.00".to_string()]);
    }

    #[test]
    fn viewer_share_in_own_expense_is_ignored() {
        let expenses = vec![paid("U1", &[("U1", 1500), ("U2", 1500)])];
        let balances = net_balances(&expenses, "U1").unwrap();
        assert_eq!(balances, vec![("U2".to_string(), MoneyCents::new(-1500))]);
    }

    #[test]
    fn other_payer_without_viewer_entry_contributes_zero() {
        let expenses = vec![paid("U2", &[("U3", 1000)])];
        assert!(compute_balances(&expenses, "U1", &no_names()).unwrap().is_settled());
    }

    #[test]
    fn opposite_debts_cancel_out() {
        let expenses = vec![paid("U2", &[("U1", 1000)]), paid("U1", &[("U2", 1000)])];
        assert_eq!(
            compute_balances(&expenses, "U1", &no_names()).unwrap().lines(),
            vec![ALL_SETTLED.to_string()]
        );
    }

    #[test]
    fn empty_input_is_settled() {
        assert_eq!(
            compute_balances(&[], "U1", &no_names()).unwrap().lines(),
            vec![ALL_SETTLED.to_string()]
        );
    }

    #[test]
    fn names_come_from_lookup_in_first_encounter_order() {
        let names: HashMap<String, String> = [
            ("U2".to_string(), "Bob".to_string()),
            ("U3".to_string(), "Carol".to_string()),
        ]
        .into_iter()
        .collect();
        let expenses = vec![
            paid("U3", &[("U1", 725)]),
            paid("U1", &[("U2", 1234)]),
            paid("U3", &[("U1", 100)]),
        ];
        assert_eq!(
            compute_balances(&expenses, "U1", &names).unwrap().lines(),
            vec![
                "You owe Carol $8.25".to_string(),
                "Bob owes you $12.34".to_string(),
            ]
        );
    }

    #[test]
    fn oversized_balances_are_rejected() {
        let huge = MoneyCents::from_major(6.0e16).unwrap();
        let expense = |id: &str| Expense {
            distribution: vec![DistributionEntry::new("U2", huge)],
            id: id.to_string(),
            ..paid("U1", &[])
        };
        let expenses = vec![expense("e1"), expense("e2")];

        assert!(matches!(
            net_balances(&expenses, "U1"),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            compute_balances(&expenses, "U1", &no_names()),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
