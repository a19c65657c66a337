use crate::analytics::{self, DashboardSummary};
use crate::commands::{clock, Out};
use crate::error::{ErrorType, IntoResult};
use crate::store::Store;
use crate::{Config, Result};

/// Computes the dashboard for the configured user: this month's totals against the monthly
/// budget, category breakdown, six month trend, limit progress and recent expenses.
pub async fn dashboard(config: &Config) -> Result<Out<DashboardSummary>> {
    let (_, today) = clock();
    let user = config.user();
    let store = config.db();
    let expenses = store
        .expenses()
        .get_all(&user.id)
        .await
        .pub_result(ErrorType::Database)?;
    let limits = store
        .limits()
        .get_all(&user.id)
        .await
        .pub_result(ErrorType::Database)?;
    let notifications = store
        .notifications()
        .get_all(&user.id)
        .await
        .pub_result(ErrorType::Database)?;

    let summary = analytics::dashboard(&expenses, &limits, &notifications, today);
    Ok(Out::new(render(&summary, config), summary))
}

fn render(summary: &DashboardSummary, config: &Config) -> String {
    let mut lines = vec![
        format!(
            "{} this month of a {} budget, {} per day",
            summary.total_this_month,
            config.user().monthly_budget(),
            summary.avg_daily
        ),
        format!(
            "Last month: {} ({}% change)",
            summary.last_month_total, summary.monthly_change_percent
        ),
    ];
    if summary.unread_notifications > 0 {
        lines.push(format!(
            "Unread notifications: {}",
            summary.unread_notifications
        ));
    }

    if !summary.top_categories.is_empty() {
        lines.push("Top categories:".to_string());
        lines.extend(summary.top_categories.iter().map(|total| {
            format!(
                "  {:<18} {:>12}",
                total.category.name(),
                total.amount.to_string()
            )
        }));
    }

    lines.push("Last 6 months:".to_string());
    lines.extend(
        summary
            .monthly_trends
            .iter()
            .map(|month| format!("  {}  {:>12}", month.month, month.amount.to_string())),
    );

    lines.extend(summary.limit_progress.iter().map(|row| {
        format!(
            "Limit {} ({}): {} of {}{}",
            row.category,
            row.period,
            row.spent,
            row.limit,
            if row.is_over_budget { ", over budget" } else { "" }
        )
    }));

    lines.push("Tips:".to_string());
    lines.extend(analytics::spending_tips().iter().map(|tip| format!("  - {tip}")));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::TREND_MONTHS;
    use crate::model::{Amount, Category};
    use crate::test::TestEnv;
    use chrono::{Duration, Local, Utc};
    use std::str::FromStr;

    #[tokio::test]
    async fn test_dashboard_totals() {
        let env = TestEnv::new().await;
        let today = Local::now().date_naive();
        env.insert_expense("30", Category::FoodDining, today, Utc::now())
            .await;
        env.insert_expense("20", Category::Travel, today, Utc::now() + Duration::seconds(1))
            .await;

        let out = dashboard(env.config()).await.unwrap();
        let summary = out.structure().unwrap();
        assert_eq!(summary.total_this_month, Amount::from_str("50").unwrap());
        assert_eq!(summary.top_categories[0].category, Category::FoodDining);
        assert_eq!(summary.monthly_trends.len(), TREND_MONTHS as usize);
        assert_eq!(summary.recent_expenses[0].category, Category::Travel);
        assert!(out.message().starts_with("$50.00 this month of a $2,000.00 budget"));
    }
}
