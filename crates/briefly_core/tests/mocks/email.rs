use std::sync::{Arc, Mutex};

use briefly_core::{Email, EmailSender, Error};

#[derive(Clone, Default)]
pub struct MockEmailSender {
    pub sent: Arc<Mutex<Vec<Email>>>,
    pub fail_with: Option<String>,
}

impl MockEmailSender {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl EmailSender for MockEmailSender {
    async fn send(&self, email: &Email) -> Result<(), Error> {
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Backend {
                status: 500,
                message: msg.clone(),
            });
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
