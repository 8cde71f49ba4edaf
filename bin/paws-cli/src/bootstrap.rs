use std::sync::Arc;

use eyre::WrapErr;
use paws_adapters::{
    core::{
        ports::{EventSink, FavoritePort, InterestPort, LabelSourcePort, PetCatalogPort},
        types::{Pet, PetId, SpeciesBreedTable, UserId},
    },
    http_api::HttpApiClient,
    labels_static::StaticLabelSource,
    observe::TracingEventSink,
    store_memory::InMemoryBackend,
};
use paws_runtime::{DiscoveryRuntime, RuntimeBuilder, TimeoutLayer};

use crate::config::{BackendKind, PawsConfig};

struct Backend {
    catalog: Arc<dyn PetCatalogPort>,
    favorites: Arc<dyn FavoritePort>,
    interest: Arc<dyn InterestPort>,
    labels: Arc<dyn LabelSourcePort>,
}

/// Build the runtime from a loaded config.
pub(crate) async fn build_runtime(cfg: &PawsConfig) -> eyre::Result<DiscoveryRuntime> {
    let backend = match cfg.api.backend {
        BackendKind::Http => {
            let client = Arc::new(HttpApiClient::new(cfg.api.base_url.clone()));
            tracing::info!(base_url = client.base_url(), "using REST backend");
            Backend {
                catalog: client.clone(),
                favorites: client.clone(),
                interest: client.clone(),
                labels: client,
            }
        }
        BackendKind::Memory => {
            let store = Arc::new(demo_backend().await);
            tracing::info!("using in-memory demo backend");
            Backend {
                catalog: store.clone(),
                favorites: store.clone(),
                interest: store,
                labels: Arc::new(StaticLabelSource::from_file_name()),
            }
        }
    };
    let events: Arc<dyn EventSink> = Arc::new(TracingEventSink::new());

    let species = if cfg.species.is_empty() {
        SpeciesBreedTable::default()
    } else {
        SpeciesBreedTable::from_entries(cfg.species.iter().cloned())
    };

    let mut builder = RuntimeBuilder::new()
        .with_catalog(backend.catalog)
        .with_favorites(backend.favorites)
        .with_interest(backend.interest)
        .with_labels(backend.labels)
        .with_events(events)
        .with_session(cfg.session.clone())
        .with_species_table(species);

    if let Some(timeout_ms) = cfg.api.request_timeout_ms {
        builder = builder.with_timeout_layer(TimeoutLayer::new(timeout_ms));
    }

    builder.build().wrap_err("failed to build discovery runtime")
}

fn demo_pet(
    id: &str,
    name: &str,
    species: &str,
    breed: &str,
    gender: &str,
    color: &str,
    owner: &str,
) -> Pet {
    Pet {
        id: PetId::from(id),
        name: name.to_string(),
        species: species.to_string(),
        breed: breed.to_string(),
        age: "2".to_string(),
        gender: gender.to_string(),
        size: "Medium".to_string(),
        color: color.to_string(),
        description: format!("{name} is looking for a home."),
        available: true,
        owner: UserId::from(owner),
        interested_adopters: Vec::new(),
        image_url: None,
    }
}

/// Demo marketplace: two owners, one adopter and a handful of pets.
async fn demo_backend() -> InMemoryBackend {
    let backend = InMemoryBackend::new();
    backend.upsert_user(UserId::from("owner-1"), "olive", Some("olive@example.com".into())).await;
    backend.upsert_user(UserId::from("owner-2"), "otto", None).await;
    backend.upsert_user(UserId::from("adopter-1"), "ada", Some("ada@example.com".into())).await;

    for pet in [
        demo_pet("1", "Coco", "dog", "Poodle", "Female", "White", "owner-1"),
        demo_pet("2", "Storm", "dog", "Siberian Husky", "Male", "Gray", "owner-1"),
        demo_pet("3", "Pepper", "dog", "Poodle", "Male", "Black", "owner-2"),
        demo_pet("4", "Mochi", "cat", "Siamese", "Female", "Cream", "owner-2"),
        demo_pet("5", "Clover", "rabbit", "Holland Lop", "Male", "Brown", "owner-1"),
    ] {
        backend.upsert_pet(pet).await;
    }
    backend
}
