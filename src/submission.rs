use chrono::{DateTime, Local, Utc};
use log::{debug, error, info};

use crate::{
    api::Mailer,
    assembler,
    dispatcher::{DispatchError, Dispatcher, UNEXPECTED_FAILURE_MESSAGE},
    document::{self, Layout, RenderError},
    form::FormStore,
    model::{OrderNumber, ValidateError},
};

/// Этап оформления заказа.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Пользователь заполняет форму.
    Editing,

    /// Заказ отправляется. Отменить отправку нельзя.
    Submitting,

    /// Заказ принят, показано подтверждение с номером.
    Confirmed(OrderNumber),
}

/// Результат одной попытки оформить заказ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Confirmed(OrderNumber),

    /// Заказ не ушёл. Форма сохранена, можно попробовать ещё раз.
    Failed(String),
}

/// Сеанс работы с формой: само хранилище плюс окно подтверждения.
///
/// После успеха форма сбрасывается только когда пользователь закроет
/// подтверждение. После неудачи сразу возвращаемся к редактированию и ничего
/// не сбрасываем.
#[derive(Debug)]
pub struct Session {
    form: FormStore,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            form: FormStore::new(),
            phase: Phase::Editing,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormStore {
        &self.form
    }

    /// Хранилище для правок. Пока показано подтверждение, правок нет.
    pub fn form_mut(&mut self) -> Option<&mut FormStore> {
        match self.phase {
            Phase::Editing => Some(&mut self.form),
            _ => None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Номер заказа, если сейчас показано подтверждение.
    pub fn confirmation(&self) -> Option<&OrderNumber> {
        match &self.phase {
            Phase::Confirmed(n) => Some(n),
            _ => None,
        }
    }

    /// Оформляет заказ из текущего состояния формы.
    pub fn submit<M: Mailer>(&mut self, dispatcher: &Dispatcher<'_, M>) -> Outcome {
        self.submit_at(dispatcher, Utc::now())
    }

    /// Дата в документе, дата в письмах и номер заказа берутся из одного
    /// момента `now`.
    pub(crate) fn submit_at<M: Mailer>(
        &mut self,
        dispatcher: &Dispatcher<'_, M>,
        now: DateTime<Utc>,
    ) -> Outcome {
        if let Phase::Confirmed(n) = &self.phase {
            return Outcome::Confirmed(n.clone());
        }

        self.phase = Phase::Submitting;
        debug!("Оформляем заказ");

        match self.run(dispatcher, now) {
            Ok(order_number) => {
                info!("Order {} placed", order_number);
                self.phase = Phase::Confirmed(order_number.clone());
                Outcome::Confirmed(order_number)
            }
            Err(e) => {
                error!("Error submitting order: {}", e);
                self.phase = Phase::Editing;
                Outcome::Failed(e.user_message())
            }
        }
    }

    fn run<M: Mailer>(&self, dispatcher: &Dispatcher<'_, M>, now: DateTime<Utc>) -> SubmitResult {
        let state = self.form.snapshot();

        state.customer.validate()?;

        let (record, items) = assembler::assemble(state);
        debug!("Собрано позиций: {}", items.len());

        let today = now.with_timezone(&Local).date_naive();
        let layout = Layout::new(&record, &items, today);
        let doc = document::render(&layout)?;

        let order_number = dispatcher.dispatch(now, &record, &items, &doc.to_base64())?;

        Ok(order_number)
    }

    /// Закрывает подтверждение и сбрасывает форму.
    pub fn dismiss(&mut self) {
        if let Phase::Confirmed(_) = self.phase {
            self.form.reset();
            self.phase = Phase::Editing;
        }
    }
}

pub type SubmitResult = std::result::Result<OrderNumber, SubmitError>;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("validate customer info: {0}")]
    Validate(#[from] ValidateError),

    #[error("generate document: {0}")]
    Document(#[from] RenderError),

    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Validate(e) => format!("Please check the form: {}.", e),
            Self::Document(_) => UNEXPECTED_FAILURE_MESSAGE.to_owned(),
            Self::Dispatch(e) => e.user_message().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dispatcher::{
            tests::{config, now, FakeMailer},
            DELIVERY_FAILED_MESSAGE,
        },
        form::FormState,
        model::CustomerField,
    };

    fn filled_session() -> Session {
        let mut session = Session::new();
        let form = session.form_mut().unwrap();

        form.set_customer_field(CustomerField::CompanyName, "Acme Co");
        form.set_customer_field(CustomerField::ContactPerson, "Jane Doe");
        form.set_customer_field(CustomerField::Phone, "021 555 0199");
        form.set_customer_field(CustomerField::Email, "jane@acme.co");
        form.set_customer_field(CustomerField::DeliveryAddress, "1 Quay St");
        form.set_customer_field(CustomerField::DeliveryDate, "2026-11-02");
        form.set_customer_field(CustomerField::DeliveryTime, "anytime");
        form.set_product_quantity(1, "2");
        form.set_chair_quantity(40, "5");

        session
    }

    #[test]
    fn success_shows_confirmation_then_resets_on_dismiss() {
        let mailer = FakeMailer::default();
        let cfg = config();
        let dispatcher = Dispatcher::new(&mailer, &cfg);
        let mut session = filled_session();

        let outcome = session.submit_at(&dispatcher, now());

        let number = match outcome {
            Outcome::Confirmed(n) => n,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert!(number.as_str().starts_with("ORD-"));
        assert_eq!(session.confirmation(), Some(&number));
        assert!(session.form_mut().is_none());

        // Форма не сбрасывается, пока подтверждение не закрыто.
        assert_eq!(session.form().snapshot().customer.company_name, "Acme Co");

        session.dismiss();

        assert_eq!(session.phase(), &Phase::Editing);
        assert_eq!(session.confirmation(), None);
        assert_eq!(session.form().snapshot(), &FormState::default());
    }

    #[test]
    fn order_number_and_date_share_one_moment() {
        let mailer = FakeMailer::default();
        let cfg = config();
        let dispatcher = Dispatcher::new(&mailer, &cfg);
        let mut session = filled_session();

        let outcome = session.submit_at(&dispatcher, now());

        let expected = format!("ORD-{}", now().timestamp_millis());
        assert_eq!(outcome, Outcome::Confirmed(OrderNumber::generate(now())));
        assert_eq!(session.confirmation().map(OrderNumber::as_str), Some(expected.as_str()));

        let local_date = now().with_timezone(&Local).format("%d/%m/%Y").to_string();
        for (_, params) in mailer.sent.borrow().iter() {
            assert_eq!(params["order_number"], expected.as_str());
            assert_eq!(params["order_date"], local_date.as_str());
        }
    }

    #[test]
    fn attachment_is_pdf() {
        let mailer = FakeMailer::default();
        let cfg = config();
        let dispatcher = Dispatcher::new(&mailer, &cfg);
        let mut session = filled_session();

        session.submit_at(&dispatcher, now());

        let sent = mailer.sent.borrow();
        let pdf = sent[0].1["order_pdf"].as_str().unwrap();
        assert!(pdf.starts_with("JVBER"));
    }

    #[test]
    fn failure_keeps_form() {
        let mailer = FakeMailer::failing(&["sales_tpl"]);
        let cfg = config();
        let dispatcher = Dispatcher::new(&mailer, &cfg);
        let mut session = filled_session();
        let before = session.form().snapshot().clone();

        let outcome = session.submit_at(&dispatcher, now());

        assert_eq!(outcome, Outcome::Failed(DELIVERY_FAILED_MESSAGE.to_owned()));
        assert_eq!(session.phase(), &Phase::Editing);
        assert_eq!(session.confirmation(), None);
        assert_eq!(session.form().snapshot(), &before);
    }

    #[test]
    fn retry_after_failure() {
        let cfg = config();
        let mut session = filled_session();

        let broken = FakeMailer::failing(&["customer_tpl"]);
        let outcome = session.submit_at(&Dispatcher::new(&broken, &cfg), now());
        assert!(matches!(outcome, Outcome::Failed(_)));

        let working = FakeMailer::default();
        let outcome = session.submit_at(&Dispatcher::new(&working, &cfg), now());
        assert!(matches!(outcome, Outcome::Confirmed(_)));
    }

    #[test]
    fn invalid_form_is_not_sent() {
        let mailer = FakeMailer::default();
        let cfg = config();
        let dispatcher = Dispatcher::new(&mailer, &cfg);
        let mut session = filled_session();
        session
            .form_mut()
            .unwrap()
            .set_customer_field(CustomerField::Email, "not-an-email");

        let outcome = session.submit_at(&dispatcher, now());

        match outcome {
            Outcome::Failed(msg) => assert!(msg.contains("Email"), "{}", msg),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(mailer.sent.borrow().is_empty());
        assert_eq!(session.form().snapshot().customer.email, "not-an-email");
    }

    #[test]
    fn empty_order_is_dispatched() {
        let mailer = FakeMailer::default();
        let cfg = config();
        let dispatcher = Dispatcher::new(&mailer, &cfg);
        let mut session = filled_session();
        let form = session.form_mut().unwrap();
        form.set_product_quantity(1, "");
        form.set_chair_quantity(40, "0");

        let outcome = session.submit_at(&dispatcher, now());

        assert!(matches!(outcome, Outcome::Confirmed(_)));
        assert_eq!(mailer.sent.borrow()[1].1["order_summary"], "");
    }

    #[test]
    fn dismiss_without_confirmation_keeps_form() {
        let mut session = filled_session();
        session.dismiss();
        assert_eq!(session.form().snapshot().customer.company_name, "Acme Co");
    }
}
