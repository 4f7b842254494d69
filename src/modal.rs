// Modal visibility is owned by the host; the view only asks for open/close

use parking_lot::Mutex;
use std::collections::HashSet;

pub const BOOKING_MODAL_ID: &str = "custom-modal-1";

pub trait ModalService: Send + Sync + 'static {
    fn open(&self, id: &str);
    fn close(&self, id: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalCall {
    Open(String),
    Close(String),
}

// Keeps a log of requests and the resulting open set; used headless and in tests
#[derive(Debug, Default)]
pub struct RecordingModalService {
    calls: Mutex<Vec<ModalCall>>,
    open: Mutex<HashSet<String>>,
}

impl RecordingModalService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ModalCall> {
        self.calls.lock().clone()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.lock().contains(id)
    }
}

impl ModalService for RecordingModalService {
    fn open(&self, id: &str) {
        self.calls.lock().push(ModalCall::Open(id.to_string()));
        self.open.lock().insert(id.to_string());
    }

    fn close(&self, id: &str) {
        self.calls.lock().push(ModalCall::Close(id.to_string()));
        self.open.lock().remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_modal_tracks_open_set() {
        let modal = RecordingModalService::new();
        modal.open(BOOKING_MODAL_ID);
        assert!(modal.is_open(BOOKING_MODAL_ID));

        modal.close("other-modal");
        assert!(modal.is_open(BOOKING_MODAL_ID));

        modal.close(BOOKING_MODAL_ID);
        assert!(!modal.is_open(BOOKING_MODAL_ID));
        assert_eq!(
            modal.calls(),
            vec![
                ModalCall::Open(BOOKING_MODAL_ID.to_string()),
                ModalCall::Close("other-modal".to_string()),
                ModalCall::Close(BOOKING_MODAL_ID.to_string()),
            ]
        );
    }
}
