//! # Favorite Toggle Controller
//!
//! Optimistic favorite toggling with rollback.
//!
//! Each toggle is a two-phase operation on the local [`FavoriteSet`]:
//!
//! 1. [`FavoriteSet::begin_toggle`] applies the change immediately.
//! 2. Exactly one remote write is issued through [`FavoritePort`].
//! 3. [`FavoriteSet::settle`] confirms the change, or restores the pet's
//!    previous membership when the write failed.
//!
//! The local lock is never held across the remote call, so toggles on
//! different pets proceed independently. Two toggles on the same pet race;
//! whichever response settles last decides the final membership.

use std::sync::{Arc, Mutex, MutexGuard};

use paws_core::{
    error::DiscoveryError,
    ports::{EventSink, FavoritePort},
    types::{DiscoveryEvent, FavoriteChange, FavoriteSet, Pet, PetId, ToggleOutcome, UserId},
};

/// Owns the local favorite mirror and reconciles it with the backend.
pub struct FavoriteController {
    user_id: Option<UserId>,
    port: Arc<dyn FavoritePort>,
    events: Arc<dyn EventSink>,
    favorites: Mutex<FavoriteSet>,
}

impl std::fmt::Debug for FavoriteController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoriteController")
            .field("user_id", &self.user_id)
            .field("favorites", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl FavoriteController {
    #[must_use]
    pub fn new(
        user_id: Option<UserId>,
        port: Arc<dyn FavoritePort>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self { user_id, port, events, favorites: Mutex::new(FavoriteSet::new()) }
    }

    /// Start from a known favorite set instead of an empty one.
    #[must_use]
    pub fn with_favorites(self, favorites: FavoriteSet) -> Self {
        *self.lock() = favorites;
        self
    }

    /// Snapshot of the local mirror.
    #[must_use]
    pub fn favorites(&self) -> FavoriteSet {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_favorite(&self, pet_id: &PetId) -> bool {
        self.lock().contains(pet_id)
    }

    /// Toggle `pet_id` for the session user.
    ///
    /// # Errors
    /// - [`DiscoveryError::NotLoggedIn`] without a user; nothing changes and
    ///   no request is sent.
    /// - [`DiscoveryError::UpdateFailed`] when the remote write fails; the
    ///   pet's membership is restored to what it was before this call.
    pub async fn toggle(&self, pet_id: &PetId) -> Result<FavoriteChange, DiscoveryError> {
        let Some(user_id) = self.user_id.as_ref() else {
            self.events.emit(DiscoveryEvent::Error { error: "favorite toggle: not logged in".into() });
            return Err(DiscoveryError::NotLoggedIn);
        };

        let pending = self.lock().begin_toggle(pet_id);
        self.events.emit(DiscoveryEvent::FavoriteToggled {
            pet_id: pet_id.clone(),
            favorite: pending.now_favorite,
        });

        match self.port.toggle_favorite(user_id, pet_id).await {
            Ok(()) => {
                let favorite = self.lock().settle(&pending, ToggleOutcome::Confirmed);
                self.events
                    .emit(DiscoveryEvent::FavoriteConfirmed { pet_id: pet_id.clone(), favorite });
                Ok(FavoriteChange { pet_id: pet_id.clone(), favorite })
            }
            Err(err) => {
                let favorite = self.lock().settle(&pending, ToggleOutcome::Rejected);
                tracing::warn!(pet_id = %pet_id, error = %err, "favorite update failed, rolled back");
                self.events.emit(DiscoveryEvent::FavoriteReverted {
                    pet_id: pet_id.clone(),
                    favorite,
                    error: err.to_string(),
                });
                Err(DiscoveryError::UpdateFailed(err))
            }
        }
    }

    /// Replace the local mirror with the backend's favorites list.
    ///
    /// # Errors
    /// [`DiscoveryError::NotLoggedIn`] without a user, or the port error.
    /// The local mirror is left untouched on failure.
    pub async fn refresh(&self) -> Result<Vec<Pet>, DiscoveryError> {
        let Some(user_id) = self.user_id.as_ref() else {
            return Err(DiscoveryError::NotLoggedIn);
        };

        let pets = self.port.list_favorites(user_id).await?;
        *self.lock() = pets.iter().map(|p| p.id.clone()).collect();
        Ok(pets)
    }

    fn lock(&self) -> MutexGuard<'_, FavoriteSet> {
        self.favorites.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, sync::Mutex};

    use paws_core::{error::ApiError, types::UserId};
    use tokio::sync::Notify;

    use super::*;

    // ── Mocks ────────────────────────────────────────────────────

    #[derive(Default)]
    struct CountingSink {
        events: Mutex<Vec<DiscoveryEvent>>,
    }

    impl EventSink for CountingSink {
        fn emit(&self, event: DiscoveryEvent) {
            self.events.lock().unwrap_or_else(|p| p.into_inner()).push(event);
        }
    }

    struct ScriptedFavorites {
        fail: bool,
        calls: Mutex<usize>,
    }

    impl ScriptedFavorites {
        fn ok() -> Self {
            Self { fail: false, calls: Mutex::new(0) }
        }

        fn failing() -> Self {
            Self { fail: true, calls: Mutex::new(0) }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap_or_else(|p| p.into_inner())
        }
    }

    #[async_trait::async_trait]
    impl FavoritePort for ScriptedFavorites {
        async fn toggle_favorite(&self, _user: &UserId, _pet: &PetId) -> Result<(), ApiError> {
            *self.calls.lock().unwrap_or_else(|p| p.into_inner()) += 1;
            if self.fail {
                Err(ApiError::Status { status: 500, message: "Failed to update favorites".into() })
            } else {
                Ok(())
            }
        }

        async fn list_favorites(&self, _user: &UserId) -> Result<Vec<Pet>, ApiError> {
            if self.fail {
                return Err(ApiError::Transport("offline".into()));
            }
            Ok(vec![sample_pet("fav-1"), sample_pet("fav-2")])
        }
    }

    /// One scripted remote call: signals `entered`, waits for `release`, then answers.
    struct Gate {
        entered: Arc<Notify>,
        release: Arc<Notify>,
        ok: bool,
    }

    impl Gate {
        fn new(ok: bool) -> Self {
            Self { entered: Arc::new(Notify::new()), release: Arc::new(Notify::new()), ok }
        }

        fn handles(&self) -> (Arc<Notify>, Arc<Notify>) {
            (self.entered.clone(), self.release.clone())
        }
    }

    struct GatedFavorites {
        gates: Mutex<VecDeque<Gate>>,
    }

    impl GatedFavorites {
        fn new(gates: Vec<Gate>) -> Self {
            Self { gates: Mutex::new(gates.into()) }
        }
    }

    #[async_trait::async_trait]
    impl FavoritePort for GatedFavorites {
        async fn toggle_favorite(&self, _user: &UserId, _pet: &PetId) -> Result<(), ApiError> {
            let gate = self.gates.lock().unwrap_or_else(|p| p.into_inner()).pop_front();
            let Some(gate) = gate else {
                return Err(ApiError::Transport("unscripted call".into()));
            };
            gate.entered.notify_one();
            gate.release.notified().await;
            if gate.ok { Ok(()) } else { Err(ApiError::Transport("connection reset".into())) }
        }

        async fn list_favorites(&self, _user: &UserId) -> Result<Vec<Pet>, ApiError> {
            Ok(vec![])
        }
    }

    fn sample_pet(id: &str) -> Pet {
        Pet {
            id: PetId::from(id),
            name: "Milo".into(),
            species: "cat".into(),
            breed: "Bengal".into(),
            age: "4".into(),
            gender: "Male".into(),
            size: "Small".into(),
            color: "Brown".into(),
            description: String::new(),
            available: true,
            owner: UserId::from("owner"),
            interested_adopters: vec![],
            image_url: None,
        }
    }

    fn controller(port: Arc<dyn FavoritePort>) -> (FavoriteController, Arc<CountingSink>) {
        let sink = Arc::new(CountingSink::default());
        (FavoriteController::new(Some(UserId::from("adopter-1")), port, sink.clone()), sink)
    }

    // ── Tests ────────────────────────────────────────────────────

    #[tokio::test]
    async fn not_logged_in_is_refused_without_remote_call() {
        let port = Arc::new(ScriptedFavorites::ok());
        let sink = Arc::new(CountingSink::default());
        let ctl = FavoriteController::new(None, port.clone(), sink);

        let result = ctl.toggle(&PetId::from("p1")).await;

        assert!(matches!(result, Err(DiscoveryError::NotLoggedIn)));
        assert!(ctl.favorites().is_empty());
        assert_eq!(port.calls(), 0);
    }

    #[tokio::test]
    async fn successful_toggle_keeps_optimistic_state() {
        let port = Arc::new(ScriptedFavorites::ok());
        let (ctl, sink) = controller(port.clone());
        let id = PetId::from("p1");

        let change = ctl.toggle(&id).await.unwrap();

        assert!(change.favorite);
        assert!(ctl.is_favorite(&id));
        assert_eq!(port.calls(), 1);
        let events = sink.events.lock().unwrap();
        assert!(matches!(events.last(), Some(DiscoveryEvent::FavoriteConfirmed { favorite: true, .. })));
    }

    #[tokio::test]
    async fn two_successful_toggles_restore_membership() {
        let port = Arc::new(ScriptedFavorites::ok());
        let (ctl, _sink) = controller(port.clone());
        let id = PetId::from("p1");
        let before = ctl.favorites();

        ctl.toggle(&id).await.unwrap();
        ctl.toggle(&id).await.unwrap();

        assert_eq!(ctl.favorites(), before);
        assert_eq!(port.calls(), 2);
    }

    #[tokio::test]
    async fn failed_update_rolls_back_exactly() {
        let port = Arc::new(ScriptedFavorites::failing());
        let (ctl, sink) = controller(port.clone());
        let ctl = ctl.with_favorites([PetId::from("p1"), PetId::from("p2")].into_iter().collect());
        let before = ctl.favorites();

        let removed = ctl.toggle(&PetId::from("p1")).await;
        let added = ctl.toggle(&PetId::from("p3")).await;

        assert!(matches!(removed, Err(DiscoveryError::UpdateFailed(ApiError::Status { .. }))));
        assert!(matches!(added, Err(DiscoveryError::UpdateFailed(_))));
        assert_eq!(ctl.favorites(), before);
        assert_eq!(port.calls(), 2);
        let events = sink.events.lock().unwrap();
        assert!(matches!(events.last(), Some(DiscoveryEvent::FavoriteReverted { favorite: false, .. })));
    }

    /// Spawn a toggle and wait until its remote call is in flight.
    async fn spawn_toggle(
        ctl: &Arc<FavoriteController>,
        pet_id: &str,
        entered: &Notify,
    ) -> tokio::task::JoinHandle<Result<FavoriteChange, DiscoveryError>> {
        let ctl = ctl.clone();
        let pet_id = PetId::from(pet_id);
        let handle = tokio::spawn(async move { ctl.toggle(&pet_id).await });
        entered.notified().await;
        handle
    }

    #[tokio::test]
    async fn toggles_on_different_pets_are_independent() {
        let (gate_a, gate_b) = (Gate::new(false), Gate::new(true));
        let (entered_a, release_a) = gate_a.handles();
        let (entered_b, release_b) = gate_b.handles();
        let (ctl, _sink) = controller(Arc::new(GatedFavorites::new(vec![gate_a, gate_b])));
        let ctl = Arc::new(ctl);

        let task_a = spawn_toggle(&ctl, "a", &entered_a).await;
        let task_b = spawn_toggle(&ctl, "b", &entered_b).await;
        assert!(ctl.is_favorite(&PetId::from("a")));
        assert!(ctl.is_favorite(&PetId::from("b")));

        release_b.notify_one();
        assert!(task_b.await.unwrap().is_ok());
        release_a.notify_one();
        assert!(task_a.await.unwrap().is_err());

        assert!(!ctl.is_favorite(&PetId::from("a")));
        assert!(ctl.is_favorite(&PetId::from("b")));
    }

    #[tokio::test]
    async fn same_pet_race_last_response_wins() {
        // Add then remove; both succeed, but the add's response arrives last.
        let (add, remove) = (Gate::new(true), Gate::new(true));
        let (entered_add, release_add) = add.handles();
        let (entered_remove, release_remove) = remove.handles();
        let (ctl, _sink) = controller(Arc::new(GatedFavorites::new(vec![add, remove])));
        let ctl = Arc::new(ctl);
        let id = PetId::from("p1");

        let task_add = spawn_toggle(&ctl, "p1", &entered_add).await;
        let task_remove = spawn_toggle(&ctl, "p1", &entered_remove).await;
        assert!(!ctl.is_favorite(&id));

        release_remove.notify_one();
        let removed = task_remove.await.unwrap().unwrap();
        assert!(!removed.favorite);
        assert!(!ctl.is_favorite(&id));

        release_add.notify_one();
        let added = task_add.await.unwrap().unwrap();
        assert!(added.favorite);
        assert!(ctl.is_favorite(&id));
    }

    #[tokio::test]
    async fn same_pet_race_late_failure_restores_its_own_snapshot() {
        // Add fails and resolves last; the remove already succeeded.
        let (add, remove) = (Gate::new(false), Gate::new(true));
        let (entered_add, release_add) = add.handles();
        let (entered_remove, release_remove) = remove.handles();
        let (ctl, _sink) = controller(Arc::new(GatedFavorites::new(vec![add, remove])));
        let ctl = Arc::new(ctl);

        let task_add = spawn_toggle(&ctl, "p1", &entered_add).await;
        let task_remove = spawn_toggle(&ctl, "p1", &entered_remove).await;

        release_remove.notify_one();
        assert!(task_remove.await.unwrap().is_ok());
        release_add.notify_one();
        assert!(matches!(task_add.await.unwrap(), Err(DiscoveryError::UpdateFailed(_))));

        assert!(!ctl.is_favorite(&PetId::from("p1")));
    }

    #[tokio::test]
    async fn refresh_seeds_mirror_from_backend() {
        let port = Arc::new(ScriptedFavorites::ok());
        let (ctl, _sink) = controller(port);

        let pets = ctl.refresh().await.unwrap();

        assert_eq!(pets.len(), 2);
        assert!(ctl.is_favorite(&PetId::from("fav-1")));
        assert!(ctl.is_favorite(&PetId::from("fav-2")));
    }

    #[tokio::test]
    async fn refresh_failure_keeps_mirror() {
        let port = Arc::new(ScriptedFavorites::failing());
        let (ctl, _sink) = controller(port);
        let ctl = ctl.with_favorites([PetId::from("keep")].into_iter().collect());

        assert!(ctl.refresh().await.is_err());
        assert!(ctl.is_favorite(&PetId::from("keep")));
    }
}
