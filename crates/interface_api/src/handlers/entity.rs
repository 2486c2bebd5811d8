//! Generic entity handlers
//!
//! One set of CRUD handlers serves every entity type; [`entity_routes`]
//! mounts them for a single descriptor.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use core_kernel::{
    Entity, EntityId, EntityRepository, EntityStore, PageRequestParser, Pager, ResponseAssembler,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use validator::Validate;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::response::{render, ResponseContext};

/// An entity that can be served over HTTP
pub trait ApiEntity: Entity + Serialize + DeserializeOwned + Validate + fmt::Display {}

impl<T> ApiEntity for T where T: Entity + Serialize + DeserializeOwned + Validate + fmt::Display {}

/// Per-entity handler state
pub struct EntityState<E: Entity> {
    repository: EntityRepository<E>,
    pager: Pager<E>,
    parser: PageRequestParser,
    assembler: ResponseAssembler<E>,
    app_name: Arc<str>,
    collection_path: Arc<str>,
}

impl<E: Entity> Clone for EntityState<E> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            pager: self.pager.clone(),
            parser: self.parser,
            assembler: self.assembler,
            app_name: Arc::clone(&self.app_name),
            collection_path: Arc::clone(&self.collection_path),
        }
    }
}

impl<E: Entity> EntityState<E> {
    pub fn new(store: Arc<dyn EntityStore<E>>, config: &ApiConfig, collection_path: &str) -> Self {
        let repository = EntityRepository::new(store);
        Self {
            pager: repository.pager(),
            repository,
            parser: config.page_parser(),
            assembler: ResponseAssembler::new(),
            app_name: Arc::from(config.app_name.as_str()),
            collection_path: Arc::from(collection_path),
        }
    }

    fn context<'a>(&'a self, sort: &'a [String]) -> ResponseContext<'a> {
        ResponseContext {
            app_name: &self.app_name,
            entity_name: E::descriptor().name,
            collection_path: &self.collection_path,
            sort,
        }
    }
}

/// Routes for one entity type, relative to its collection path
pub fn entity_routes<E, S>(state: EntityState<E>) -> Router<S>
where
    E: ApiEntity,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list::<E>).post(create::<E>).put(update::<E>))
        .route("/:id", get(get_one::<E>).delete(delete::<E>))
        .with_state(state)
}

/// Creates a new entity
pub async fn create<E: ApiEntity>(
    State(state): State<EntityState<E>>,
    payload: Result<Json<E>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(entity) = payload?;
    debug!("REST request to save {} : {}", E::descriptor().name, entity);
    entity.validate()?;

    let outcome = state.assembler.created(state.repository.insert(entity).await);
    Ok(render(outcome, &state.context(&[])))
}

/// Replaces an existing entity
pub async fn update<E: ApiEntity>(
    State(state): State<EntityState<E>>,
    payload: Result<Json<E>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(entity) = payload?;
    debug!("REST request to update {} : {}", E::descriptor().name, entity);
    entity.validate()?;

    let outcome = state.assembler.updated(state.repository.update(entity).await);
    Ok(render(outcome, &state.context(&[])))
}

/// Lists one page of entities
///
/// `page` and `size` take their first occurrence; every `sort` parameter is
/// applied in order.
pub async fn list<E: ApiEntity>(
    State(state): State<EntityState<E>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    debug!("REST request to get a page of {}", E::descriptor().name);

    let first = |name: &str| {
        params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };
    let sort: Vec<String> = params
        .iter()
        .filter(|(key, _)| key == "sort")
        .map(|(_, value)| value.clone())
        .collect();

    let result = match state
        .parser
        .parse(E::descriptor(), first("page"), first("size"), &sort)
    {
        Ok(descriptor) => state.pager.query(&descriptor, true).await,
        Err(error) => Err(error),
    };

    render(state.assembler.listed(result), &state.context(&sort))
}

/// Gets one entity by id
pub async fn get_one<E: ApiEntity>(
    State(state): State<EntityState<E>>,
    Path(id): Path<i64>,
) -> Response {
    debug!("REST request to get {} : {}", E::descriptor().name, id);

    let outcome = state.assembler.found(state.repository.get(EntityId::new(id)).await);
    render(outcome, &state.context(&[]))
}

/// Deletes an entity; deleting an absent id still succeeds
pub async fn delete<E: ApiEntity>(
    State(state): State<EntityState<E>>,
    Path(id): Path<i64>,
) -> Response {
    debug!("REST request to delete {} : {}", E::descriptor().name, id);

    let id = EntityId::new(id);
    let outcome = state.assembler.deleted(id, state.repository.delete(id).await);
    render(outcome, &state.context(&[]))
}
