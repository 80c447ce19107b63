use crate::session::types::SessionRecord;

/// Queue a success flash message for the next rendered page.
pub fn push_success_message(record: &mut SessionRecord, message: impl Into<String>) {
    record.success_messages.push(message.into());
}

/// Queue an error flash message for the next rendered page.
pub fn push_error_message(record: &mut SessionRecord, message: impl Into<String>) {
    record.error_messages.push(message.into());
}

/// Drain both flash queues. Flash messages are read-once: after this call the
/// session holds none, and the caller is responsible for persisting the
/// drained record.
pub fn take_flash_messages(record: &mut SessionRecord) -> (Vec<String>, Vec<String>) {
    (
        std::mem::take(&mut record.success_messages),
        std::mem::take(&mut record.error_messages),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn anonymous_record() -> SessionRecord {
        SessionRecord {
            user: None,
            success_messages: Vec::new(),
            error_messages: Vec::new(),
            csrf_secret: None,
            expires_at: Utc::now() + Duration::seconds(600),
            ttl: 600,
        }
    }

    #[test]
    fn test_flash_is_read_once() {
        // Given a session with queued flash messages
        let mut record = anonymous_record();
        push_success_message(&mut record, "Product created");
        push_error_message(&mut record, "The form has expired. Please try again");

        // When draining the queues
        let (success, error) = take_flash_messages(&mut record);

        // Then both queues are returned in order and left empty
        assert_eq!(success, vec!["Product created"]);
        assert_eq!(error, vec!["The form has expired. Please try again"]);
        let (success, error) = take_flash_messages(&mut record);
        assert!(success.is_empty());
        assert!(error.is_empty());
    }

    #[test]
    fn test_messages_accumulate_in_order() {
        let mut record = anonymous_record();
        push_success_message(&mut record, "first");
        push_success_message(&mut record, "second");

        let (success, _) = take_flash_messages(&mut record);
        assert_eq!(success, vec!["first", "second"]);
    }
}
