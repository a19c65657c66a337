use crate::advice::{AdviceContext, Advisor, ChatMessage};
use crate::analytics;
use crate::commands::{clock, Out};
use crate::error::{Error, ErrorType, IntoResult};
use crate::store::Store;
use crate::{Config, Result};
use tracing::debug;

/// Asks `advisor` the user's question, grounded on this month's spending summary. Returns the
/// reply text.
///
/// # Errors
/// - A validation error if the question is blank.
/// - A collaborator error if the advisor fails or times out.
pub async fn advise(config: &Config, advisor: &dyn Advisor, question: &str) -> Result<Out<String>> {
    let question = question.trim();
    if question.is_empty() {
        return Err(Error::validation("Ask a question to get advice"));
    }

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
    let summary = analytics::dashboard(&expenses, &limits, &[], today);
    let context = AdviceContext::new(user, &summary);
    debug!("Advice context: {context:?}");

    let reply = advisor
        .generate_advice(&[ChatMessage::user(question)], &context)
        .await
        .pub_result(ErrorType::Collaborator)?;
    Ok(Out::new(reply.clone(), reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Res;
    use crate::model::{Amount, Category};
    use crate::test::TestEnv;
    use async_trait::async_trait;
    use chrono::{Local, Utc};
    use std::str::FromStr;
    use std::sync::Mutex;

    /// Records the context it was given and answers with a fixed reply.
    #[derive(Default)]
    struct FakeAdvisor {
        seen: Mutex<Option<AdviceContext>>,
        fail: bool,
    }

    #[async_trait]
    impl Advisor for FakeAdvisor {
        async fn generate_advice(
            &self,
            history: &[ChatMessage],
            context: &AdviceContext,
        ) -> Res<String> {
            if self.fail {
                anyhow::bail!("AI request failed: 500 boom");
            }
            *self.seen.lock().unwrap() = Some(context.clone());
            Ok(format!("You asked: {}", history[0].content))
        }
    }

    #[tokio::test]
    async fn test_advise_passes_summary() {
        let env = TestEnv::new().await;
        let today = Local::now().date_naive();
        env.insert_expense("80", Category::FoodDining, today, Utc::now())
            .await;
        let advisor = FakeAdvisor::default();

        let out = advise(env.config(), &advisor, "  How do I save?  ")
            .await
            .unwrap();
        assert_eq!(out.message(), "You asked: How do I save?");
        let context = advisor.seen.lock().unwrap().clone().unwrap();
        assert_eq!(context.total_this_month, Amount::from_str("80").unwrap());
        assert_eq!(context.monthly_budget, Amount::from_str("2000").unwrap());
        assert_eq!(context.top_categories[0].category, Category::FoodDining);
    }

    #[tokio::test]
    async fn test_advise_errors() {
        let env = TestEnv::new().await;
        let advisor = FakeAdvisor {
            fail: true,
            ..Default::default()
        };
        assert!(advise(env.config(), &advisor, " ")
            .await
            .unwrap_err()
            .is_validation());
        let err = advise(env.config(), &advisor, "Help").await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Collaborator);
        assert!(err.to_string().contains("500 boom"));
    }
}
