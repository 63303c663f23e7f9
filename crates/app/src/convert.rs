//! Mapping between backend DTOs and engine values.

use api_types::{
    expense::{
        CreateExpenseDto, DistributionDto, ExpenseDto, ExpenseSumDto, ExtractExpenseFromImageDto,
        ExtractedExpenseDto,
    },
    group::GroupDto,
};
use engine::{
    CategoryShare, DistributionEntry, Expense, ExpenseSubmission, Group, Member, MoneyCents,
    ReceiptExtraction, ReceiptImage, ResultEngine, category_breakdown, receipt::DEFAULT_CURRENCY,
};

pub fn group_from_dto(dto: GroupDto) -> ResultEngine<Group> {
    let members = dto
        .members
        .into_iter()
        .map(|member| Member::new(member.id, member.name))
        .collect();
    Group::new(dto.id, dto.name, members)
}

pub fn expense_from_dto(dto: ExpenseDto) -> ResultEngine<Expense> {
    let distribution = dto
        .expense
        .iter()
        .map(|entry| {
            Ok(DistributionEntry::new(
                entry.user.as_str(),
                MoneyCents::from_major(entry.amount)?,
            ))
        })
        .collect::<ResultEngine<Vec<_>>>()?;
    let amount = match dto.amount {
        Some(amount) => MoneyCents::from_major(amount)?,
        None => MoneyCents::try_sum(distribution.iter().map(|entry| entry.amount))?,
    };
    Ok(Expense {
        payer_id: dto.paid_by.id().to_string(),
        id: dto.id,
        amount,
        description: dto.description,
        date: dto.date,
        category: dto.category,
        group_id: dto.group,
        distribution,
    })
}

pub fn submission_to_dto(submission: ExpenseSubmission) -> CreateExpenseDto {
    CreateExpenseDto {
        description: submission.description,
        date: submission.date,
        category: submission.category,
        paid_by: submission.paid_by,
        group: submission.group_id,
        expense: submission
            .distribution
            .into_iter()
            .map(|entry| DistributionDto {
                user: entry.member_id,
                amount: entry.amount.to_major(),
            })
            .collect(),
    }
}

pub fn receipt_to_dto(image: ReceiptImage) -> ExtractExpenseFromImageDto {
    ExtractExpenseFromImageDto {
        image_base64: image.image_base64,
        mime_type: image.mime_type,
        default_currency: DEFAULT_CURRENCY.to_string(),
    }
}

pub fn extraction_from_dto(dto: ExtractedExpenseDto) -> ResultEngine<ReceiptExtraction> {
    Ok(ReceiptExtraction {
        price: MoneyCents::from_major(dto.price)?,
        item_name: dto.item_name,
        category: dto.category,
        receipt_date: dto.receipt_date,
    })
}

/// Total and per-category rows of a sum response.
pub fn breakdown_from_dto(dto: ExpenseSumDto) -> ResultEngine<(MoneyCents, Vec<CategoryShare>)> {
    let total = MoneyCents::from_major(dto.total)?;
    let sums = dto
        .categories
        .into_iter()
        .map(|(category, amount)| Ok((category, MoneyCents::from_major(amount)?)))
        .collect::<ResultEngine<Vec<_>>>()?;
    Ok((total, category_breakdown(total, sums)))
}

#[cfg(test)]
mod tests {
    use api_types::{expense::PaidBy, group::MemberDto};
    use engine::EngineError;

    use super::*;

    fn dto(amount: Option<f64>) -> ExpenseDto {
        ExpenseDto {
            id: "e1".to_string(),
            amount,
            description: "Dinner".to_string(),
            date: "2025-03-14T19:00:00Z".parse().unwrap(),
            category: "food".to_string(),
            paid_by: PaidBy::Id("u1".to_string()),
            group: "g1".to_string(),
            expense: vec![
                DistributionDto {
                    user: "u1".to_string(),
                    amount: 12.5,
                },
                DistributionDto {
                    user: "u2".to_string(),
                    amount: 12.5,
                },
            ],
        }
    }

    #[test]
    fn missing_total_is_rebuilt_from_distribution() {
        let expense = expense_from_dto(dto(None)).unwrap();
        assert_eq!(expense.amount, MoneyCents::new(2500));
        assert_eq!(expense.payer_id, "u1");
        assert_eq!(expense.distribution[1].amount, MoneyCents::new(1250));

        let expense = expense_from_dto(dto(Some(30.0))).unwrap();
        assert_eq!(expense.amount, MoneyCents::new(3000));
    }

    #[test]
    fn empty_group_dto_is_rejected() {
        let err = group_from_dto(GroupDto {
            id: "g0".to_string(),
            name: "Ghost".to_string(),
            members: Vec::new(),
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidGroup(_)));

        let group = group_from_dto(GroupDto {
            id: "g1".to_string(),
            name: "Flat".to_string(),
            members: vec![MemberDto {
                id: "u1".to_string(),
                name: "Alice".to_string(),
            }],
        })
        .unwrap();
        assert!(group.is_solo());
    }

    #[test]
    fn submission_amounts_go_out_in_major_units() {
        let body = submission_to_dto(ExpenseSubmission {
            description: "Taxi".to_string(),
            date: "2025-03-15T08:00:00Z".parse().unwrap(),
            category: "transport".to_string(),
            paid_by: "u1".to_string(),
            group_id: "g1".to_string(),
            distribution: vec![DistributionEntry::new("u2", MoneyCents::new(805))],
        });
        assert_eq!(body.group, "g1");
        assert_eq!(body.expense[0].amount, 8.05);
    }

    #[test]
    fn sum_becomes_breakdown() {
        let (total, rows) = breakdown_from_dto(ExpenseSumDto {
            total: 80.0,
            categories: [("food".to_string(), 60.0), ("fun".to_string(), 20.0)]
                .into_iter()
                .collect(),
        })
        .unwrap();
        assert_eq!(total, MoneyCents::new(8000));
        assert_eq!(rows[0].category, "food");
        assert_eq!(rows[0].percentage, "75.00%");
        assert_eq!(rows[1].percentage, "25.00%");
    }

    #[test]
    fn receipt_request_carries_default_currency() {
        let body = receipt_to_dto(ReceiptImage::from_bytes("scan.png", b"png"));
        assert_eq!(body.mime_type, "image/png");
        assert_eq!(body.default_currency, "CAD");
    }
}
