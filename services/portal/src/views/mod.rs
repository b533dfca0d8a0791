//! View controllers
//!
//! A view holds exactly the state its page shows: loaded lists, filter
//! inputs and the `loading`/`submitting` flags. Mutations go to the API
//! first and are then applied to the loaded list, never refetched.
//!
//! View methods take `&self`. The future a method returns owns the
//! in-flight request: dropping it cancels the request, and the local list
//! is only touched after the response has arrived.

use std::{
    future::Future,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
};

use auth::{Session, SessionStore};
use common::{
    error::{ClientError, ClientResult},
    notify::Notifier,
};
use tracing::{debug, warn};

use crate::models::{Application, Visa};

pub mod add_visa;
pub mod all_visas;
pub mod home;
pub mod login;
pub mod my_added_visas;
pub mod my_applications;
pub mod register;
pub mod visa_details;

pub use add_visa::AddVisaView;
pub use all_visas::{AllVisasView, VisaTypeFilter};
pub use home::HomeView;
pub use login::LoginView;
pub use my_added_visas::MyAddedVisasView;
pub use my_applications::MyApplicationsView;
pub use register::{RegisterForm, RegisterView};
pub use visa_details::VisaDetailsView;

/// Records addressable by their API id
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Visa {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Application {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A list loaded from the API plus its loading flag
#[derive(Debug)]
pub struct ListState<T> {
    inner: Mutex<ListInner<T>>,
}

#[derive(Debug)]
struct ListInner<T> {
    items: Vec<T>,
    loading: bool,
    loaded: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(ListInner {
                items: Vec::new(),
                loading: false,
                loaded: false,
            }),
        }
    }
}

impl<T: Identified + Clone> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the loaded items
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether a load has completed successfully at least once
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn find(&self, id: &str) -> Option<T> {
        self.lock().items.iter().find(|item| item.id() == id).cloned()
    }

    /// Run `fetch` and install its result; a failure keeps the current items
    pub async fn load<F>(&self, fetch: F) -> ClientResult<Vec<T>>
    where
        F: Future<Output = ClientResult<Vec<T>>>,
    {
        let loading = LoadingFlag::raise(self);
        let result = fetch.await;
        drop(loading);

        if let Ok(items) = &result {
            let mut inner = self.lock();
            inner.items = items.clone();
            inner.loaded = true;
        }
        result
    }

    pub fn append(&self, item: T) {
        self.lock().items.push(item);
    }

    /// Replace the item with the same id; returns whether one was found
    pub fn replace(&self, item: T) -> bool {
        let mut inner = self.lock();
        match inner.items.iter_mut().find(|current| current.id() == item.id()) {
            Some(current) => {
                *current = item;
                true
            }
            None => false,
        }
    }

    /// Remove the item with `id`; returns whether one was found
    pub fn remove(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.items.len();
        inner.items.retain(|item| item.id() != id);
        inner.items.len() != before
    }

    fn lock(&self) -> MutexGuard<'_, ListInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps a list's `loading` flag up; lowers it on drop, so a cancelled load
/// does not leave the view loading
struct LoadingFlag<'a, T> {
    list: &'a ListState<T>,
}

impl<'a, T> LoadingFlag<'a, T> {
    fn raise(list: &'a ListState<T>) -> Self {
        set_loading(list, true);
        Self { list }
    }
}

impl<T> Drop for LoadingFlag<'_, T> {
    fn drop(&mut self) {
        set_loading(self.list, false);
    }
}

fn set_loading<T>(list: &ListState<T>, loading: bool) {
    list.inner
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .loading = loading;
}

/// Confirmation dialog shown before a destructive action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: &'static str,
    pub text: &'static str,
    pub confirm_label: &'static str,
}

pub const DELETE_VISA_PROMPT: ConfirmPrompt = ConfirmPrompt {
    title: "Are you sure?",
    text: "You won't be able to revert this!",
    confirm_label: "Yes, delete it!",
};

pub const CANCEL_APPLICATION_PROMPT: ConfirmPrompt = ConfirmPrompt {
    title: "Are you sure?",
    text: "You won't be able to revert this!",
    confirm_label: "Yes, cancel it!",
};

/// Answers confirmation prompts
pub trait Confirm {
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&ConfirmPrompt) -> bool,
{
    fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self(prompt)
    }
}

/// Result of a mutation that reached (or was stopped before) the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The API acknowledged the change and the local list reflects it
    Applied,
    /// The API answered without acknowledging a change
    NoOp,
    /// The user declined the confirmation; nothing was sent
    Declined,
}

/// Rejects a second submission while one is in flight
#[derive(Debug, Default)]
pub struct SubmitLatch {
    busy: AtomicBool,
}

impl SubmitLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Take the latch, or `None` if a submission is in flight
    pub fn try_acquire(&self) -> Option<SubmitGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitGuard { latch: self })
    }
}

/// Held for the duration of a submission; releases the latch on drop
#[derive(Debug)]
pub struct SubmitGuard<'a> {
    latch: &'a SubmitLatch,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}

pub(crate) const ALREADY_SUBMITTING: &str = "A submission is already in progress";

/// Take `latch` or fail with a notified validation error
pub(crate) fn begin_submit<'a>(
    latch: &'a SubmitLatch,
    notifier: &dyn Notifier,
) -> ClientResult<SubmitGuard<'a>> {
    latch.try_acquire().ok_or_else(|| {
        debug!("Rejected duplicate submission");
        reject(notifier, ClientError::Validation(ALREADY_SUBMITTING.to_string()))
    })
}

/// Notify a client-side failure and hand the error back
pub(crate) fn reject(notifier: &dyn Notifier, err: ClientError) -> ClientError {
    warn!("Rejected before sending: {}", err);
    notifier.error(&err.user_message());
    err
}

/// The current session, or a notified validation error
pub(crate) fn require_session(store: &SessionStore) -> ClientResult<Session> {
    store.current_session().ok_or_else(|| {
        reject(
            store.notifier().as_ref(),
            ClientError::Validation("Please log in to continue".to_string()),
        )
    })
}
