use std::path::Path;

use api_types::{expense::ExpenseDto, user::User};
use chrono::{Local, NaiveDate, NaiveTime, Utc};
use engine::{
    DateRange, Expense, ExpenseDraft, Group, MoneyCents, ReceiptImage, compute_balances,
};

use crate::{
    AddArgs, Command, EditArgs, ExpenseFields, StatsArgs,
    client::Client,
    config::AppConfig,
    convert,
    error::{AppError, Result},
    session::Session,
};

pub struct App {
    client: Client,
    session: Session,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            client: Client::new(&config.base_url)?,
            session: Session::new(&config.session_path),
        })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login(args) => self.login(&args.email).await,
            Command::Logout => self.logout(),
            Command::Groups => self.groups().await,
            Command::Expenses(args) => self.expenses(args.group.as_deref(), args.mine).await,
            Command::Add(args) => self.add(args).await,
            Command::Edit(args) => self.edit(args).await,
            Command::Delete(args) => self.delete(&args.id).await,
            Command::Stats(args) => self.stats(args).await,
        }
    }

    fn viewer(&self) -> Result<User> {
        self.session.user()?.ok_or(AppError::NotSignedIn)
    }

    async fn login(&self, email: &str) -> Result<()> {
        let user = self.client.user_by_email(email.trim()).await?;
        self.session.sign_in(&user)?;
        tracing::info!("signed in as {}", user.id);
        println!("Signed in as {} <{}>", user.name, user.email);
        Ok(())
    }

    fn logout(&self) -> Result<()> {
        self.session.sign_out()?;
        println!("Signed out.");
        Ok(())
    }

    async fn load_groups(&self, viewer: &User) -> Result<Vec<Group>> {
        let dtos = self.client.groups_for_user(&viewer.id).await?;
        let mut groups = Vec::with_capacity(dtos.len());
        for dto in dtos {
            match convert::group_from_dto(dto) {
                Ok(group) => groups.push(group),
                Err(err) => tracing::warn!("skipping group: {err}"),
            }
        }
        Ok(groups)
    }

    async fn groups(&self) -> Result<()> {
        let viewer = self.viewer()?;
        let groups = self.load_groups(&viewer).await?;
        if groups.is_empty() {
            println!("No groups.");
        }
        for group in &groups {
            println!(
                "{}  {} ({} members)",
                group.id(),
                group.name(),
                group.members().len()
            );
        }
        Ok(())
    }

    async fn expenses(&self, only_group: Option<&str>, mine: bool) -> Result<()> {
        let viewer = self.viewer()?;
        let groups: Vec<Group> = self
            .load_groups(&viewer)
            .await?
            .into_iter()
            .filter(|group| only_group.is_none_or(|id| group.id() == id))
            .collect();
        if groups.is_empty() {
            return Err(AppError::Input(match only_group {
                Some(id) => format!("unknown group: {id}"),
                None => "no groups to show".to_string(),
            }));
        }

        let dtos = if mine {
            self.client.expenses_for_user(&viewer.id).await?
        } else {
            let ids: Vec<String> = groups.iter().map(|g| g.id().to_string()).collect();
            self.client.expenses_for_groups(&ids).await?
        };
        let expenses = expenses_from_dtos(dtos);

        for group in &groups {
            let in_group: Vec<Expense> = expenses
                .iter()
                .filter(|expense| expense.group_id == group.id())
                .cloned()
                .collect();
            print_group(group, &in_group, &viewer.id)?;
        }
        Ok(())
    }

    async fn add(&self, args: AddArgs) -> Result<()> {
        let viewer = self.viewer()?;
        let groups = self.load_groups(&viewer).await?;
        let group = find_group(&groups, &args.group)?;

        let mut draft = ExpenseDraft::for_group(&viewer.id, group, Utc::now());
        self.apply_fields(&mut draft, args.fields).await?;

        let submission = draft.submit(&viewer.id)?;
        let created = self
            .client
            .create_expense(&convert::submission_to_dto(submission))
            .await?;
        tracing::debug!("created expense {}", created.id);
        println!("Expense has been recorded! ({})", created.id);
        Ok(())
    }

    async fn edit(&self, args: EditArgs) -> Result<()> {
        let viewer = self.viewer()?;
        let groups = self.load_groups(&viewer).await?;
        let expense = convert::expense_from_dto(self.client.expense(&args.id).await?)?;

        let mut draft = ExpenseDraft::from_expense(&expense, &groups)?;
        if let Some(group_id) = &args.group {
            draft.group = Some(find_group(&groups, group_id)?);
        }
        self.apply_fields(&mut draft, args.fields).await?;

        let submission = draft.submit(&viewer.id)?;
        self.client
            .update_expense(&args.id, &convert::submission_to_dto(submission))
            .await?;
        println!("Expense has been recorded! ({})", args.id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.viewer()?;
        self.client.delete_expense(id).await?;
        println!("Expense {id} deleted.");
        Ok(())
    }

    async fn stats(&self, args: StatsArgs) -> Result<()> {
        let viewer = self.viewer()?;
        let month = DateRange::current_month(Local::now().date_naive())?;
        let range = DateRange::new(
            args.from.unwrap_or(month.from()),
            args.to.unwrap_or(month.to()),
        );

        let sum = self
            .client
            .expense_sum(&viewer.id, range.from(), range.to())
            .await?;
        let (total, rows) = convert::breakdown_from_dto(sum)?;

        println!(
            "{} - {}",
            range.from().format("%b %d, %Y"),
            range.to().format("%b %d, %Y")
        );
        println!("Total: {total}");
        for row in rows {
            println!(
                "{:>8}  {:<20} {:>10}",
                row.percentage,
                row.category,
                row.amount.to_string()
            );
        }
        Ok(())
    }

    /// Receipt first, then explicit flags on top.
    async fn apply_fields(
        &self,
        draft: &mut ExpenseDraft,
        fields: ExpenseFields,
    ) -> Result<()> {
        if let Some(path) = &fields.receipt {
            let image = read_receipt(path)?;
            let extracted = self
                .client
                .extract_expense(&convert::receipt_to_dto(image))
                .await?;
            draft.apply_receipt(convert::extraction_from_dto(extracted)?);
            println!("Expense details extracted from image!");
        }

        if let Some(amount) = &fields.amount {
            draft.amount = Some(amount.parse::<MoneyCents>()?);
        }
        if let Some(description) = fields.description {
            draft.description = Some(description);
        }
        if let Some(category) = fields.category {
            draft.category = Some(category);
        }
        if let Some(paid_by) = fields.paid_by {
            draft.paid_by = Some(paid_by);
        }
        if let Some(date) = fields.date {
            draft.date = Some(start_of_day(date));
        }
        if fields.one_sided {
            draft.split_equally = false;
        }
        if fields.split_equally {
            draft.split_equally = true;
        }
        Ok(())
    }
}

fn find_group(groups: &[Group], id: &str) -> Result<Group> {
    groups
        .iter()
        .find(|group| group.id() == id)
        .cloned()
        .ok_or_else(|| AppError::Input(format!("unknown group: {id}")))
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn read_receipt(path: &Path) -> Result<ReceiptImage> {
    let bytes = std::fs::read(path)?;
    let name = path.to_string_lossy();
    Ok(ReceiptImage::from_bytes(&name, &bytes))
}

/// Converts what the backend sent, skipping expenses that do not convert.
fn expenses_from_dtos(dtos: Vec<ExpenseDto>) -> Vec<Expense> {
    let mut expenses = Vec::with_capacity(dtos.len());
    for dto in dtos {
        let id = dto.id.clone();
        match convert::expense_from_dto(dto) {
            Ok(expense) => expenses.push(expense),
            Err(err) => tracing::warn!("skipping expense {id}: {err}"),
        }
    }
    expenses
}

fn print_group(group: &Group, expenses: &[Expense], viewer_id: &str) -> Result<()> {
    println!("== {}", group.name());
    if expenses.is_empty() {
        println!("No expenses yet.");
    }
    for expense in expenses {
        println!(
            "{}  {:<24} {:>10}",
            expense.date.format("%b %d"),
            expense.description,
            expense.amount.to_string()
        );
    }
    if !group.is_solo() {
        for line in compute_balances(expenses, viewer_id, group)?.lines() {
            println!("{line}");
        }
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_start_at_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(
            start_of_day(date).to_rfc3339(),
            "2025-03-14T00:00:00+00:00"
        );
    }

    #[test]
    fn unknown_group_is_input_error() {
        let err = find_group(&[], "g1").unwrap_err();
        assert!(matches!(err, AppError::Input(msg) if msg == "unknown group: g1"));
    }

    fn expense_dto(id: &str, amount: f64) -> ExpenseDto {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "description": "Dinner",
            "date": "2025-03-14T19:00:00Z",
            "category": "food",
            "paidBy": "u1",
            "group": "g1",
            "expense": [{"user": "u2", "amount": amount}]
        }))
        .unwrap()
    }

    #[test]
    fn malformed_expenses_are_skipped() {
        let expenses = expenses_from_dtos(vec![
            expense_dto("e1", 12.5),
            expense_dto("e2", 1.0e300),
            expense_dto("e3", 4.0),
        ]);
        let ids: Vec<&str> = expenses.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e1", "e3"]);
    }
}
