//! Dispatch coordinator.
//!
//! Owns the [`LocalViewState`] and the connected signer. Submits built
//! requests through the signer and, once the ledger confirms, re-reads
//! every object the request referenced.
//!
//! # Flow
//!
//! ```text
//! request_increment / request_mint
//!   -> build (local validation, no I/O)
//!   -> dispatch (signer called exactly once)
//!        Confirmed -> on_confirmed -> one re-read per referenced object
//!        Rejected  -> on_rejected  -> notify, view untouched
//! ```
//!
//! The view is published on a `watch` channel; notifications go out on a
//! `broadcast` channel. Overlapping dispatches are not serialized, so the
//! last re-read to land wins.

mod notify;
mod view;

pub use notify::{Notification, Severity};
pub use view::{LocalViewState, ViewUpdate};

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use sui_sync_client::{
    extract_u64_field, ArgInput, ClientError, LedgerMetadata, MoveTarget, ObjectId,
    ObjectReader, PendingAction, Result, SubmissionResult, TransactionExecutor,
    TransactionRequest,
};
use tokio::sync::{broadcast, watch};
use tracing::{debug, error, info, warn};

use crate::config::{CounterConfig, MintConfig};

/// Buffered notifications per subscriber before the oldest are dropped.
pub const NOTIFICATION_CAPACITY: usize = 64;

/// Coordinates reads, submissions and reconciliation for one view.
pub struct DispatchCoordinator {
    reader: Arc<dyn ObjectReader>,
    metadata: Option<Arc<dyn LedgerMetadata>>,
    signer: RwLock<Option<Arc<dyn TransactionExecutor>>>,
    counter: CounterConfig,
    mint: Option<MintConfig>,
    /// Object id -> field path shown for that object.
    tracked: BTreeMap<String, String>,
    view_tx: watch::Sender<LocalViewState>,
    notify_tx: broadcast::Sender<Notification>,
}

impl DispatchCoordinator {
    /// Create a coordinator tracking the configured counter. No signer is connected.
    pub fn new(reader: Arc<dyn ObjectReader>, counter: CounterConfig) -> Self {
        let (view_tx, _) = watch::channel(LocalViewState::default());
        let (notify_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let mut tracked = BTreeMap::new();
        tracked.insert(counter.object_id.clone(), counter.field.clone());

        Self {
            reader,
            metadata: None,
            signer: RwLock::new(None),
            counter,
            mint: None,
            tracked,
            view_tx,
            notify_tx,
        }
    }

    /// Source for the protocol version shown in the view.
    pub fn with_metadata(mut self, metadata: Arc<dyn LedgerMetadata>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Enable minting and track the treasury cap's supply.
    ///
    /// Each object shows one field, so the treasury cap must not be the
    /// counter object.
    pub fn with_mint(mut self, mint: MintConfig) -> Result<Self> {
        if self.tracked.contains_key(&mint.treasury_cap_id) {
            return Err(ClientError::InvalidArgument(format!(
                "treasury cap {} is already tracked as the counter",
                mint.treasury_cap_id
            )));
        }
        self.tracked
            .insert(mint.treasury_cap_id.clone(), mint.supply_field.clone());
        self.mint = Some(mint);
        Ok(self)
    }

    pub fn with_signer(self, signer: Arc<dyn TransactionExecutor>) -> Self {
        self.connect_signer(signer);
        self
    }

    /// Record the endpoint descriptor in the view.
    pub fn with_endpoint(self, endpoint: impl Into<String>) -> Self {
        self.update(ViewUpdate::Endpoint(endpoint.into()));
        self
    }

    // --- Signer ---

    pub fn connect_signer(&self, signer: Arc<dyn TransactionExecutor>) {
        *self.signer.write().unwrap_or_else(PoisonError::into_inner) = Some(signer);
        info!("Signer connected");
    }

    pub fn disconnect_signer(&self) {
        *self.signer.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("Signer disconnected");
    }

    pub fn has_signer(&self) -> bool {
        self.current_signer().is_some()
    }

    fn current_signer(&self) -> Option<Arc<dyn TransactionExecutor>> {
        self.signer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // --- Presentation surface ---

    /// Receiver that sees every view change.
    pub fn view(&self) -> watch::Receiver<LocalViewState> {
        self.view_tx.subscribe()
    }

    pub fn snapshot(&self) -> LocalViewState {
        self.view_tx.borrow().clone()
    }

    /// Displayed counter value, once loaded.
    pub fn display_value(&self) -> Option<u64> {
        self.tracked_value(&self.counter.object_id)
    }

    /// Displayed coin supply, when minting is configured and it has loaded.
    pub fn supply_value(&self) -> Option<u64> {
        let mint = self.mint.as_ref()?;
        self.tracked_value(&mint.treasury_cap_id)
    }

    fn tracked_value(&self, object_id: &str) -> Option<u64> {
        let id = ObjectId::new(object_id).ok()?;
        self.view_tx.borrow().value_of(&id)
    }

    /// Receiver for status notifications emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notify_tx.subscribe()
    }

    pub fn counter(&self) -> &CounterConfig {
        &self.counter
    }

    fn update(&self, update: ViewUpdate) {
        self.view_tx.send_modify(|view| view.apply(update));
    }

    fn notify(&self, notification: Notification) {
        debug!(notification = %notification, "Notify");
        // No subscribers is fine.
        let _ = self.notify_tx.send(notification);
    }

    // --- Reads ---

    /// Load the protocol version and every tracked object.
    ///
    /// A missing protocol version is reported but not fatal. Returns the
    /// counter value; a failed counter read is returned as the error.
    pub async fn initial_load(&self) -> Result<u64> {
        self.load_protocol_version().await;
        self.load_tracked().await
    }

    /// Fetch the endpoint's version descriptor for display.
    ///
    /// Failure notifies `ProtocolVersionUnavailable` and leaves the view as is.
    pub async fn load_protocol_version(&self) {
        let Some(metadata) = &self.metadata else {
            return;
        };
        match metadata.protocol_version().await {
            Ok(version) => self.update(ViewUpdate::ProtocolVersion(version)),
            Err(e) => {
                warn!(error = %e, "Protocol version unavailable");
                self.notify(Notification::ProtocolVersionUnavailable {
                    message: e.message(),
                });
            }
        }
    }

    /// Read every tracked object, counter first, and return the counter value.
    ///
    /// Every failed read notifies `ReadFailed`, so a caller that retries this
    /// sees one notification per failed attempt.
    pub async fn load_tracked(&self) -> Result<u64> {
        let counter_id = self.counter.object_id.clone();
        let value = self.refresh(&counter_id).await?.ok_or_else(|| {
            ClientError::MalformedResponse(format!("counter {} is not tracked", counter_id))
        })?;

        for object_id in self.tracked.keys().filter(|id| **id != counter_id) {
            // Failures are already logged and notified.
            let _ = self.refresh(object_id).await;
        }

        info!(object_id = %counter_id, value, "Tracked objects loaded");
        Ok(value)
    }

    /// Re-read one object. On failure the previous value stays in the view.
    ///
    /// Returns the field value for tracked objects, `None` otherwise.
    pub async fn refresh(&self, object_id: &str) -> Result<Option<u64>> {
        let result = match ObjectId::new(object_id) {
            Ok(id) => self.read_object(&id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            if e.is_transport_error() {
                error!(object_id, error = %e, "Read failed");
            } else {
                warn!(object_id, error = %e, "Read failed");
            }
            self.notify(Notification::ReadFailed {
                object_id: object_id.to_string(),
                message: e.message(),
            });
        }
        result
    }

    async fn read_object(&self, id: &ObjectId) -> Result<Option<u64>> {
        let object = self.reader.get_object(id).await?;
        let value = match self.tracked.get(id.as_str()) {
            Some(field) => Some(extract_u64_field(&object, field)?),
            None => None,
        };
        debug!(object_id = %id, version = object.version, value = ?value, "Object loaded");
        self.update(ViewUpdate::Loaded {
            object_id: id.clone(),
            version: object.version,
            value,
        });
        Ok(value)
    }

    // --- Actions ---

    /// Increment the shared counter.
    pub async fn request_increment(&self) -> Result<SubmissionResult> {
        let action = MoveTarget::new(&self.counter.package_id, &self.counter.module).map(|target| {
            PendingAction::new(
                self.counter.function.clone(),
                target,
                vec![ArgInput::object(self.counter.object_id.clone())],
            )
        });
        self.submit_action(&self.counter.function, action).await
    }

    /// Mint `amount` coins to `recipient`.
    ///
    /// Arguments are `[treasury cap, amount, recipient]`, in that order.
    pub async fn request_mint(
        &self,
        amount: impl Into<i128>,
        recipient: &str,
    ) -> Result<SubmissionResult> {
        let Some(mint) = &self.mint else {
            return self
                .submit_action(
                    "mint",
                    Err(ClientError::InvalidArgument(
                        "minting is not configured".to_string(),
                    )),
                )
                .await;
        };
        let action = MoveTarget::new(&mint.package_id, &mint.module).map(|target| {
            PendingAction::new(
                mint.function.clone(),
                target,
                vec![
                    ArgInput::object(mint.treasury_cap_id.clone()),
                    ArgInput::u64(amount),
                    ArgInput::address(recipient),
                ],
            )
        });
        self.submit_action(&mint.function, action).await
    }

    async fn submit_action(
        &self,
        operation: &str,
        action: Result<PendingAction>,
    ) -> Result<SubmissionResult> {
        match action.and_then(PendingAction::build) {
            Ok(request) => self.dispatch(&request).await,
            Err(e) => {
                warn!(operation, error = %e, "Request not built");
                self.notify(Notification::InvalidArgument {
                    operation: operation.to_string(),
                    message: e.message(),
                });
                Err(e)
            }
        }
    }

    /// Submit through the connected signer.
    pub async fn dispatch(&self, request: &TransactionRequest) -> Result<SubmissionResult> {
        // Clone out so the lock is not held across the await.
        let signer = self.current_signer();
        self.dispatch_with(request, signer.as_deref()).await
    }

    /// Submit through an explicit signer, or fail with `NoSigner` when there is none.
    ///
    /// The signer is called exactly once. A rejection is an `Ok` result;
    /// only a missing signer is an error.
    pub async fn dispatch_with(
        &self,
        request: &TransactionRequest,
        signer: Option<&dyn TransactionExecutor>,
    ) -> Result<SubmissionResult> {
        let Some(signer) = signer else {
            warn!(operation = request.operation(), "No signer connected");
            self.notify(Notification::NoSigner {
                operation: request.operation().to_string(),
            });
            return Err(ClientError::NoSigner);
        };

        debug!(call = %request.call_target(), "Submitting transaction");
        match signer.sign_and_execute(request).await {
            Ok(response) => {
                self.on_confirmed(request, &response.digest).await;
                Ok(SubmissionResult::from(response))
            }
            Err(e) => {
                self.on_rejected(request, &e.message);
                Ok(SubmissionResult::Rejected { reason: e.message })
            }
        }
    }

    /// Record the confirmation, then re-read each referenced object once.
    ///
    /// A failed re-read marks the object stale; it never undoes the success.
    pub async fn on_confirmed(&self, request: &TransactionRequest, digest: &str) {
        info!(call = %request.call_target(), digest, "Transaction confirmed");
        self.update(ViewUpdate::Confirmed {
            digest: digest.to_string(),
        });
        self.notify(Notification::Confirmed {
            operation: request.operation().to_string(),
            digest: digest.to_string(),
        });

        for id in request.referenced_objects() {
            if let Err(e) = self.read_object(id).await {
                warn!(object_id = %id, error = %e, "Reconciliation failed, view is stale");
                self.update(ViewUpdate::Stale(id.clone()));
                self.notify(Notification::ReconcileFailed {
                    object_id: id.to_string(),
                    message: e.message(),
                });
            }
        }
    }

    /// Surface a rejection. The view is left as it was.
    pub fn on_rejected(&self, request: &TransactionRequest, reason: &str) {
        warn!(call = %request.call_target(), reason, "Transaction rejected");
        self.notify(Notification::Rejected {
            operation: request.operation().to_string(),
            reason: reason.to_string(),
        });
    }
}
