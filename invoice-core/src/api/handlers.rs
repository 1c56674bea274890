use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::api::types::{
    DetailsUpdate, FormatQuery, InvoiceResponse, ItemUpdate, PartyUpdate, TotalResponse,
};
use crate::api::AppState;
use crate::editor::logo::is_image_mime;
use crate::editor::{Command, LogoSource};
use crate::error::InvoiceError;
use crate::models::money::format_money;
use crate::models::{Invoice, ItemField, PartyField};
use crate::print::{print_invoice, PrintReceipt};
use crate::render::render;

fn reject(context: &str, e: InvoiceError) -> StatusCode {
    let status = e.status_code();
    if status.is_server_error() {
        error!("{} failed: {}", context, e);
    } else {
        warn!("{} rejected: {}", context, e);
    }
    status
}

async fn apply(state: &AppState, context: &str, command: Command) -> Result<Invoice, StatusCode> {
    state
        .editor
        .apply(command)
        .await
        .map_err(|e| reject(context, e))
}

fn respond(state: &AppState, invoice: Invoice) -> Json<InvoiceResponse> {
    Json(InvoiceResponse::new(
        invoice,
        &state.render_options.currency_label,
    ))
}

/// Health check endpoint.
pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "invoice-core",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /invoice`
pub async fn get_invoice_handler(
    State(state): State<AppState>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let invoice = state
        .editor
        .snapshot()
        .await
        .map_err(|e| reject("Snapshot", e))?;
    Ok(respond(&state, invoice))
}

/// `POST /invoice/reset`
pub async fn reset_handler(
    State(state): State<AppState>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    info!("Resetting invoice");
    let invoice = apply(&state, "Reset", Command::Reset).await?;
    Ok(respond(&state, invoice))
}

/// `PUT /invoice/issuer`
pub async fn issuer_handler(
    State(state): State<AppState>,
    Json(update): Json<PartyUpdate>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let field: PartyField = update.field.parse().map_err(|e| reject("Issuer update", e))?;
    let invoice = apply(
        &state,
        "Issuer update",
        Command::SetIssuer {
            field,
            value: update.value,
        },
    )
    .await?;
    Ok(respond(&state, invoice))
}

/// `PUT /invoice/billed-to`
pub async fn billed_to_handler(
    State(state): State<AppState>,
    Json(update): Json<PartyUpdate>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let field: PartyField = update
        .field
        .parse()
        .map_err(|e| reject("Billed-to update", e))?;
    let invoice = apply(
        &state,
        "Billed-to update",
        Command::SetBilledTo {
            field,
            value: update.value,
        },
    )
    .await?;
    Ok(respond(&state, invoice))
}

/// `PUT /invoice/details`
///
/// Each present field is applied as its own command, in the order
/// greeting, number, date.
pub async fn details_handler(
    State(state): State<AppState>,
    Json(update): Json<DetailsUpdate>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let commands: Vec<Command> = [
        update.greeting.map(Command::SetGreeting),
        update.invoice_number.map(Command::SetInvoiceNumber),
        update.invoice_date.map(Command::SetInvoiceDate),
    ]
    .into_iter()
    .flatten()
    .collect();

    let mut latest = None;
    for command in commands {
        latest = Some(apply(&state, "Details update", command).await?);
    }

    let invoice = match latest {
        Some(invoice) => invoice,
        None => state
            .editor
            .snapshot()
            .await
            .map_err(|e| reject("Snapshot", e))?,
    };
    Ok(respond(&state, invoice))
}

/// `POST /invoice/items`
pub async fn add_item_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<InvoiceResponse>), StatusCode> {
    let invoice = apply(&state, "Add item", Command::AddItem).await?;
    Ok((StatusCode::CREATED, respond(&state, invoice)))
}

/// `PATCH /invoice/items/:index`
pub async fn update_item_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(update): Json<ItemUpdate>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let field: ItemField = update.field.parse().map_err(|e| reject("Item update", e))?;
    let invoice = apply(
        &state,
        "Item update",
        Command::UpdateItem {
            index,
            field,
            value: update.raw_value(),
        },
    )
    .await?;
    Ok(respond(&state, invoice))
}

/// `DELETE /invoice/items/:index`
pub async fn remove_item_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let invoice = apply(&state, "Remove item", Command::RemoveItem { index }).await?;
    Ok(respond(&state, invoice))
}

/// `GET /invoice/total`
pub async fn total_handler(
    State(state): State<AppState>,
) -> Result<Json<TotalResponse>, StatusCode> {
    let invoice = state
        .editor
        .snapshot()
        .await
        .map_err(|e| reject("Snapshot", e))?;
    let total = invoice.total();
    Ok(Json(TotalResponse {
        total,
        display: format_money(&state.render_options.currency_label, total),
        item_count: invoice.items.len(),
    }))
}

/// `POST /invoice/logo`
///
/// Accepts raw image bytes. The load completes in the background; a
/// failure leaves the current logo in place and is not reported back.
pub async fn upload_logo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !is_image_mime(content_type) {
        warn!("Rejected logo upload with content type {:?}", content_type);
        return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_ascii_lowercase();

    info!("Accepted {} byte logo upload ({})", body.len(), mime);
    state.editor.load_logo(LogoSource::Bytes {
        mime,
        bytes: body.to_vec(),
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "status": "accepted" })),
    ))
}

/// `DELETE /invoice/logo`
pub async fn clear_logo_handler(
    State(state): State<AppState>,
) -> Result<Json<InvoiceResponse>, StatusCode> {
    let invoice = apply(&state, "Clear logo", Command::ClearLogo).await?;
    Ok(respond(&state, invoice))
}

/// `GET /invoice/preview`
pub async fn preview_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let format = query.format.unwrap_or_default();
    let invoice = state
        .editor
        .snapshot()
        .await
        .map_err(|e| reject("Snapshot", e))?;
    let document = render(&invoice, &state.render_options, format);
    Ok(([(header::CONTENT_TYPE, format.content_type())], document))
}

/// `POST /invoice/print`
///
/// Prints the state as of this request; later edits do not affect the
/// submitted document.
pub async fn print_handler(
    State(state): State<AppState>,
    Query(query): Query<FormatQuery>,
) -> Result<Json<PrintReceipt>, StatusCode> {
    let format = query.format.unwrap_or_default();
    let invoice = state
        .editor
        .snapshot()
        .await
        .map_err(|e| reject("Snapshot", e))?;

    let options = state.render_options.clone();
    let sink = state.sink.clone();
    let receipt = tokio::task::spawn_blocking(move || {
        print_invoice(&invoice, &options, format, sink.as_ref())
    })
    .await
    .map_err(|e| {
        error!("Print task panicked: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| reject("Print", e))?;

    info!("Printed invoice to {}", receipt.location);
    Ok(Json(receipt))
}
