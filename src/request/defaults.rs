//! Built-in behavior of the five default actions.

use super::context::ActionContext;
use crate::action::{ActionKind, BehaviorResult, PAGING};
use crate::error::RequestError;
use crate::model::inflect::singularize;
use crate::model::{ModelError, Record, RecordId};
use serde_json::Value;
use tracing::debug;

pub(crate) async fn run(ctx: &mut ActionContext) -> BehaviorResult {
    match ctx.kind() {
        ActionKind::Index => index(ctx).await,
        ActionKind::Show => show(ctx).await,
        ActionKind::Create => create(ctx).await,
        ActionKind::Update => update(ctx).await,
        ActionKind::Destroy => destroy(ctx).await,
        ActionKind::Custom => Ok(()),
    }
}

async fn index(ctx: &mut ActionContext) -> BehaviorResult {
    let page = ctx
        .params()
        .integer("page")
        .map_err(RequestError::InvalidPaging)?;

    if page.is_some() && !ctx.allowed(PAGING) {
        return Err(RequestError::PagingNotAllowed {
            action: ctx.action_name().to_string(),
            resource: ctx.resource().map(|r| r.name.clone()).unwrap_or_default(),
        });
    }

    let records = collection(ctx).await?;
    let Some(page) = page else {
        ctx.body(records);
        return Ok(());
    };

    let per_page = ctx
        .params()
        .integer("per_page")
        .map_err(RequestError::InvalidPaging)?
        .unwrap_or(ctx.default_per_page());
    if per_page == 0 {
        return Err(RequestError::InvalidPaging("per_page".to_string()));
    }

    debug!(page, per_page, total = records.len(), "Paging index");
    if let Some(window) = page_window(records, page, per_page) {
        ctx.body(window);
    }
    Ok(())
}

/// Records in `[lower, upper]` with `lower = (per_page - 1) * page` and
/// `upper = lower + per_page - 1`, clamped to the end of the collection.
/// `None` when `lower` lies past the end.
fn page_window(records: Vec<Record>, page: u64, per_page: u64) -> Option<Vec<Record>> {
    let lower = usize::try_from(per_page.checked_sub(1)?.checked_mul(page)?).ok()?;
    let len = usize::try_from(per_page).ok()?;
    if lower > records.len() {
        return None;
    }
    Some(records.into_iter().skip(lower).take(len).collect())
}

/// Every record the index action lists: the whole model at the top level,
/// or the records reached from the root record through each nested
/// association.
async fn collection(ctx: &ActionContext) -> Result<Vec<Record>, RequestError> {
    let chain = ctx.resources();
    let root = match chain.first() {
        Some(root) => root,
        None => return Ok(Vec::new()),
    };
    if chain.len() == 1 {
        return Ok(root.model.all().await?);
    }

    let root_key = format!("{}_id", singularize(&root.name));
    let root_id = ctx.params().id(&root_key)?;
    let mut records = vec![root.model.fetch(root_id).await?];

    for pair in chain.windows(2) {
        let (owner, resource) = (&pair[0], &pair[1]);
        let mut next = Vec::new();
        for record in &records {
            if let Some(id) = RecordId::of(record) {
                next.extend(owner.model.related(id, &resource.name).await?);
            }
        }
        records = next;
    }
    Ok(records)
}

async fn show(ctx: &mut ActionContext) -> BehaviorResult {
    let record = ctx.record().await?;
    ctx.body(record);
    Ok(())
}

async fn create(ctx: &mut ActionContext) -> BehaviorResult {
    let model = ctx.require_model()?;
    let mut fields = ctx.attributes()?;

    let singular = ctx.resource().is_some_and(|r| r.singular);
    if let (true, Some(key)) = (singular, ctx.parent_id_key()) {
        let parent_id = ctx.parent_resource_id()?;
        fields.insert(key, Value::from(parent_id.0));
    }

    let created = model.create(fields).await?;
    ctx.body(created);
    Ok(())
}

async fn update(ctx: &mut ActionContext) -> BehaviorResult {
    let model = ctx.require_model()?;
    let id = record_id(ctx, &ctx.record().await?)?;
    let fields = ctx.attributes()?;

    let updated = model.update(id, fields).await?;
    ctx.body(updated);
    Ok(())
}

async fn destroy(ctx: &mut ActionContext) -> BehaviorResult {
    let model = ctx.require_model()?;
    let id = record_id(ctx, &ctx.record().await?)?;
    model.destroy(id).await?;
    Ok(())
}

fn record_id(ctx: &ActionContext, record: &Record) -> Result<RecordId, RequestError> {
    RecordId::of(record).ok_or_else(|| {
        let model = ctx.model().map(|m| m.name().to_string()).unwrap_or_default();
        RequestError::Model(ModelError::Invalid(format!("{model} record without an id")))
    })
}
