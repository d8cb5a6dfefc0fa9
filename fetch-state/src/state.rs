use payloads::ClientError;

/// Lifecycle of one request.
///
/// At any time the state is exactly one of: idle (nothing set), loading,
/// success (`data` set) or error (`error` set). While loading, data from the
/// previous success is kept so views can keep showing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    data: Option<T>,
    loading: bool,
    error: Option<ClientError>,
    success: bool,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> RequestState<T> {
    pub fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            success: false,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_idle(&self) -> bool {
        !self.loading && !self.success && self.error.is_none()
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.success = false;
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
        self.success = true;
    }

    pub(crate) fn fail(&mut self, error: ClientError) {
        self.data = None;
        self.loading = false;
        self.error = Some(error);
        self.success = false;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::idle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_keeps_previous_data_and_clears_error() {
        let mut state = RequestState::idle();
        state.succeed(1);
        state.begin();
        assert!(state.is_loading());
        assert!(!state.is_success());
        assert_eq!(state.data(), Some(&1));

        state.fail(ClientError::Timeout);
        assert_eq!(state.data(), None);
        state.begin();
        assert_eq!(state.error(), None);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut state = RequestState::idle();
        state.fail(ClientError::Timeout);
        state.reset();
        let first = state.clone();
        state.reset();
        assert_eq!(state, first);
        assert_eq!(state, RequestState::<i32>::idle());
        assert!(state.is_idle());
    }
}
