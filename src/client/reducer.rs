use serde::Serialize;

use super::Phase;

/// State of one asynchronous workflow, shared by every client feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<T> {
  Idle,
  Loading,
  Succeeded(T),
  Failed(String),
}

impl<T> Default for Lifecycle<T> {
  fn default() -> Self {
    Lifecycle::Idle
  }
}

impl<T> Lifecycle<T> {
  pub fn apply(&mut self, phase: Phase<T>) {
    *self = match phase {
      Phase::Request => Lifecycle::Loading,
      Phase::Success(payload) => Lifecycle::Succeeded(payload),
      Phase::Fail(error) => Lifecycle::Failed(error),
      Phase::Reset => Lifecycle::Idle,
    };
  }

  pub fn is_loading(&self) -> bool {
    matches!(self, Lifecycle::Loading)
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      Lifecycle::Failed(error) => Some(error),
      _ => None,
    }
  }
}

impl<T: Serialize> Lifecycle<T> {
  /// Renders the slice the way UI code reads it, with the payload under `key`.
  pub fn view(&self, key: &str) -> json::Value {
    match self {
      Lifecycle::Idle => json::json!({}),
      Lifecycle::Loading => json::json!({ "loading": true }),
      Lifecycle::Succeeded(payload) => {
        let mut view = json::json!({ "loading": false, "success": true });
        view[key] = json::to_value(payload).unwrap_or(json::Value::Null);
        view
      }
      Lifecycle::Failed(error) => {
        json::json!({ "loading": false, "error": error })
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use json::{Value, json};

  use super::*;

  #[test]
  fn request_then_success() {
    let mut state = Lifecycle::<Value>::default();

    state.apply(Phase::Request);
    assert!(state.is_loading());
    assert_eq!(state.view("coupon"), json!({ "loading": true }));

    state.apply(Phase::Success(json!({ "id": 1 })));
    assert_eq!(
      state.view("coupon"),
      json!({ "loading": false, "success": true, "coupon": { "id": 1 } })
    );
    assert_eq!(state, Lifecycle::Succeeded(json!({ "id": 1 })));
  }

  #[test]
  fn failure_is_terminal() {
    let mut state = Lifecycle::<Value>::default();

    state.apply(Phase::Request);
    state.apply(Phase::Fail("Coupon expired".into()));

    assert!(!state.is_loading());
    assert_eq!(state.error(), Some("Coupon expired"));
    assert_eq!(
      state.view("discount"),
      json!({ "loading": false, "error": "Coupon expired" })
    );
  }

  #[test]
  fn reset_from_any_state() {
    for mut state in [
      Lifecycle::Idle,
      Lifecycle::Loading,
      Lifecycle::Succeeded(json!({ "automaticInvoicing": false })),
      Lifecycle::Failed("nope".into()),
    ] {
      state.apply(Phase::Reset);
      assert_eq!(state, Lifecycle::Idle);
      assert_eq!(state.view("settings"), json!({}));
    }
  }
}
