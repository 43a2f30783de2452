//! Product CRUD endpoints
//!
//! Create and update accept either JSON or multipart/form-data; the photo
//! can only arrive via multipart. `category_name` and `photo_url` in
//! responses are read-time projections.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path as FsPath;

use crate::{
    error::{ApiError, ApiResult},
    models::{self, NewProduct, ProductRecord, ProductResponse, UpdateProduct},
    response::ApiResponse,
    validation::{self, ValidationErrors},
    AppState,
};

/// Loosely-typed product fields, shared between create and update
#[derive(Debug, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default, deserialize_with = "crate::models::loose_bool")]
    pub is_active: Option<bool>,
}

/// Photo received through a multipart field
#[derive(Debug)]
pub struct UploadedPhoto {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Parse the request body as JSON or multipart depending on content type.
/// Type errors in multipart text fields are recorded as validation messages.
async fn parse_payload(
    req: Request,
    errors: &mut ValidationErrors,
) -> ApiResult<(ProductInput, Option<UploadedPhoto>)> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| bad_body(format!("Invalid multipart body: {}", e)))?;

        let mut input = ProductInput::default();
        let mut photo = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| bad_body(format!("Invalid multipart body: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "photo" => {
                    let extension = field
                        .file_name()
                        .map(|f| {
                            FsPath::new(f)
                                .extension()
                                .and_then(|e| e.to_str())
                                .unwrap_or_default()
                                .to_string()
                        })
                        .unwrap_or_default();
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| bad_body(format!("Invalid multipart body: {}", e)))?;
                    photo = Some(UploadedPhoto {
                        bytes: data.to_vec(),
                        extension,
                    });
                }
                "category_id" => {
                    let text = field_text(field).await?;
                    match text.parse() {
                        Ok(value) => input.category_id = Some(value),
                        Err(_) => errors.add("category_id", "Category id must be an integer"),
                    }
                }
                "name" => input.name = Some(field_text(field).await?),
                "description" => {
                    let text = field_text(field).await?;
                    input.description = Some(if text.is_empty() { None } else { Some(text) });
                }
                "price" => {
                    let text = field_text(field).await?;
                    match text.parse() {
                        Ok(value) => input.price = Some(value),
                        Err(_) => errors.add("price", "Price must be a number"),
                    }
                }
                "stock" => {
                    let text = field_text(field).await?;
                    match text.parse() {
                        Ok(value) => input.stock = Some(value),
                        Err(_) => errors.add("stock", "Stock must be an integer"),
                    }
                }
                "is_active" => {
                    let text = field_text(field).await?;
                    input.is_active = Some(models::parse_loose_bool(&text));
                }
                _ => {}
            }
        }

        Ok((input, photo))
    } else {
        let Json(input) = Json::<ProductInput>::from_request(req, &())
            .await
            .map_err(|e| bad_body(e.to_string()))?;
        Ok((input, None))
    }
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| bad_body(format!("Invalid multipart body: {}", e)))
}

fn bad_body(message: String) -> ApiError {
    let mut errors = ValidationErrors::new();
    errors.add("body", message);
    errors.into()
}

/// Validate a create payload, producing the insertable product
fn validate_create(
    input: &ProductInput,
    photo: Option<&UploadedPhoto>,
    mut errors: ValidationErrors,
) -> Result<NewProduct, ValidationErrors> {
    let name = input.name.clone().unwrap_or_default();
    errors.check("name", validation::validate_name(&name));

    if input.category_id.is_none() {
        errors.add("category_id", "Category id is required");
    }
    match input.price {
        Some(price) => errors.check("price", validation::validate_price(price)),
        None => errors.add("price", "Price is required"),
    }
    match input.stock {
        Some(stock) => errors.check("stock", validation::validate_stock(stock)),
        None => errors.add("stock", "Stock is required"),
    }
    if let Some(photo) = photo {
        errors.check(
            "photo",
            validation::validate_photo(&photo.extension, photo.bytes.len()),
        );
    }

    match (input.category_id, input.price, input.stock) {
        (Some(category_id), Some(price), Some(stock)) if errors.is_empty() => Ok(NewProduct {
            category_id,
            name,
            photo: None,
            description: input.description.clone().flatten(),
            price,
            stock,
            is_active: input.is_active.unwrap_or(true),
        }),
        _ => Err(errors),
    }
}

/// Validate an update payload; every field is optional
fn validate_update(
    input: &ProductInput,
    photo: Option<&UploadedPhoto>,
    mut errors: ValidationErrors,
) -> Result<UpdateProduct, ValidationErrors> {
    if let Some(name) = &input.name {
        errors.check("name", validation::validate_name(name));
    }
    if let Some(price) = input.price {
        errors.check("price", validation::validate_price(price));
    }
    if let Some(stock) = input.stock {
        errors.check("stock", validation::validate_stock(stock));
    }
    if let Some(photo) = photo {
        errors.check(
            "photo",
            validation::validate_photo(&photo.extension, photo.bytes.len()),
        );
    }
    errors.into_result()?;

    Ok(UpdateProduct {
        category_id: input.category_id,
        name: input.name.clone(),
        photo: None,
        description: input.description.clone(),
        price: input.price,
        stock: input.stock,
        is_active: input.is_active,
    })
}

/// The old photo filename, only when the new upload actually replaces it.
/// Filenames are content hashes, so re-uploading identical bytes yields the
/// same file and nothing must be deleted.
fn replaced_photo<'a>(old: Option<&'a str>, new: &str) -> Option<&'a str> {
    old.filter(|old| *old != new)
}

/// Delete a stored photo unless another product row still references it
async fn delete_photo_unless_shared(
    state: &AppState,
    filename: &str,
    product_id: i64,
) -> ApiResult<()> {
    let shared = state
        .product_repository
        .photo_in_use(filename, product_id)
        .await
        .map_err(ApiError::internal)?;

    if !shared {
        state
            .storage
            .delete(filename)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to delete photo: {}", e)))?;
    }
    Ok(())
}

fn to_response(state: &AppState, record: ProductRecord) -> ProductResponse {
    let photo_url = record.photo.as_ref().map(|photo| state.storage.url(photo));
    record.into_response(photo_url)
}

async fn ensure_category_exists(state: &AppState, category_id: i64) -> ApiResult<()> {
    if !state
        .category_repository
        .exists(category_id)
        .await
        .map_err(ApiError::internal)?
    {
        let mut errors = ValidationErrors::new();
        errors.add("category_id", "Selected category does not exist");
        return Err(errors.into());
    }
    Ok(())
}

/// List all products
pub async fn list(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ProductResponse>>>> {
    let products = state
        .product_repository
        .find_all_records()
        .await
        .map_err(ApiError::internal)?
        .into_iter()
        .map(|record| to_response(&state, record))
        .collect();

    Ok(Json(ApiResponse::success(
        "Products fetched successfully",
        products,
    )))
}

/// Create a product
pub async fn create(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<ApiResponse<ProductResponse>>> {
    let mut errors = ValidationErrors::new();
    let (input, photo) = parse_payload(req, &mut errors).await?;
    let mut new_product = validate_create(&input, photo.as_ref(), errors)?;

    ensure_category_exists(&state, new_product.category_id).await?;

    if let Some(photo) = &photo {
        let filename = state
            .storage
            .store(&photo.bytes, &photo.extension)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store photo: {}", e)))?;
        new_product.photo = Some(filename);
    }

    let product = state
        .product_repository
        .create(&new_product)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to create product: {}", e)))?;

    let record = state
        .product_repository
        .find_record(product.id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::Internal("Created product vanished".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Product created successfully",
        to_response(&state, record),
    )))
}

/// Get a product by id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<ProductResponse>>> {
    let record = state
        .product_repository
        .find_record(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Product retrieved successfully",
        to_response(&state, record),
    )))
}

/// Partially update a product. A new photo replaces the stored file.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    req: Request,
) -> ApiResult<Json<ApiResponse<ProductResponse>>> {
    let mut errors = ValidationErrors::new();
    let (input, photo) = parse_payload(req, &mut errors).await?;
    let mut changes = validate_update(&input, photo.as_ref(), errors)?;

    if let Some(category_id) = changes.category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let existing = state
        .product_repository
        .find_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if let Some(photo) = &photo {
        let filename = state
            .storage
            .store(&photo.bytes, &photo.extension)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store photo: {}", e)))?;

        if let Some(old_photo) = replaced_photo(existing.photo.as_deref(), &filename) {
            delete_photo_unless_shared(&state, old_photo, existing.id).await?;
        }

        changes.photo = Some(Some(filename));
    }

    let updated = state
        .product_repository
        .update(id, &changes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to update product: {}", e)))?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    let record = state
        .product_repository
        .find_record(updated.id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::Internal("Updated product vanished".to_string()))?;

    Ok(Json(ApiResponse::success(
        "Product updated successfully",
        to_response(&state, record),
    )))
}

/// Delete a product, removing its stored photo first
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let product = state
        .product_repository
        .find_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if let Some(photo) = &product.photo {
        delete_photo_unless_shared(&state, photo, product.id).await?;
    }

    state
        .product_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to delete product: {}", e)))?;

    Ok(Json(ApiResponse::success_empty(
        "Product deleted successfully",
    )))
}
