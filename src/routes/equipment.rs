use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::error::Result;
use crate::models::Equipment;
use crate::routes::validation::{optional_text, parse_checkbox, required_field};
use crate::services::{EquipmentInput, EquipmentService};
use crate::session::CurrentUser;
use crate::AppState;

/// List active equipment
pub async fn list_equipment(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Equipment>>> {
    let equipment = EquipmentService::new(&state.db).list_active().await?;
    Ok(Json(equipment))
}

/// Create equipment from a multipart form (`type`, `name`, `description`,
/// `is_active`, optional `image` file)
pub async fn create_equipment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Equipment>)> {
    let input = read_equipment_form(multipart?).await?;

    let equipment = EquipmentService::new(&state.db).create(input).await?;
    tracing::info!("User {} created equipment {}", user.id, equipment.id);

    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment; omitting the image keeps the stored one
pub async fn update_equipment(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Equipment>> {
    let service = EquipmentService::new(&state.db);
    service.find_by_id(id).await?;

    let input = read_equipment_form(multipart?).await?;

    let equipment = service.update(id, input).await?;
    Ok(Json(equipment))
}

/// Delete equipment that no workout references
pub async fn delete_equipment(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    EquipmentService::new(&state.db).delete(id).await?;
    Ok(Json(json!({ "message": "Equipment deleted" })))
}

async fn read_equipment_form(mut multipart: Multipart) -> Result<EquipmentInput> {
    let mut equipment_type = None;
    let mut name = None;
    let mut description = None;
    let mut is_active = false;
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "type" => equipment_type = Some(field.text().await?),
            "name" => name = Some(field.text().await?),
            "description" => description = Some(field.text().await?),
            "is_active" => is_active = parse_checkbox(&field.text().await?),
            "image" => {
                // Browsers submit an empty part when no file was chosen
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    image = Some(bytes.to_vec());
                }
            }
            other => tracing::debug!("Ignoring unknown equipment form field '{}'", other),
        }
    }

    Ok(EquipmentInput {
        equipment_type: required_field(equipment_type, "type")?,
        name: required_field(name, "name")?,
        description: optional_text(description),
        is_active,
        image,
    })
}
