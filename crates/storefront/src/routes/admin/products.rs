//! Admin product management.
//!
//! Create and edit submit `multipart/form-data`: text fields, the URLs of
//! existing images the admin kept (`existing_images`), and new files
//! (`images`). New files go to the upload endpoint only after the form
//! validates.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shopeasy_core::ProductId;

use crate::api::{ApiToken, Product};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, RequireAdmin};
use crate::models::{SessionUser, toast_error, toast_success};
use crate::routes::products::{BRANDS, CATEGORIES};
use crate::routes::{PageQuery, inline_api_error, parse_id, toast_api_error};
use crate::state::AppState;
use crate::validation::{FieldErrors, MAX_NEW_IMAGES, ProductForm};
use crate::views::{Layout, Pagination};

// =============================================================================
// View Types
// =============================================================================

/// Product table row.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub stock: u32,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            short_id: product.id.short().to_string(),
            name: product.name.clone(),
            price: product.price.display(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            stock: product.stock,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/index.html")]
pub struct AdminProductsTemplate {
    pub layout: Layout,
    pub products: Vec<ProductRowView>,
    pub pagination: Pagination,
    pub error: Option<String>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products/form.html")]
pub struct ProductFormTemplate {
    pub layout: Layout,
    /// `None` when creating.
    pub product_id: Option<String>,
    pub form: ProductForm,
    pub errors: FieldErrors,
    pub categories: &'static [&'static str],
    pub brands: &'static [&'static str],
    pub max_images: usize,
}

impl ProductFormTemplate {
    fn new(
        layout: Layout,
        product_id: Option<&ProductId>,
        form: ProductForm,
        errors: FieldErrors,
    ) -> Self {
        Self {
            layout,
            product_id: product_id.map(ToString::to_string),
            form,
            errors,
            categories: &CATEGORIES,
            brands: &BRANDS,
            max_images: MAX_NEW_IMAGES,
        }
    }

    #[must_use]
    pub const fn is_edit(&self) -> bool {
        self.product_id.is_some()
    }

    #[must_use]
    pub fn action(&self) -> String {
        self.product_id.as_ref().map_or_else(
            || "/admin/products/create".to_string(),
            |id| format!("/admin/products/{id}/edit"),
        )
    }
}

// =============================================================================
// Multipart Handling
// =============================================================================

/// A file attached to the product form.
#[derive(Debug)]
struct NewImage {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// A parsed product form submission.
#[derive(Debug, Default)]
struct ProductSubmission {
    form: ProductForm,
    files: Vec<NewImage>,
}

async fn read_submission(mut multipart: Multipart) -> Result<ProductSubmission> {
    let bad_request = |e: axum::extract::multipart::MultipartError| AppError::BadRequest(e.body_text());
    let mut submission = ProductSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "images" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(bad_request)?;
            // Browsers send an empty part when no file was picked
            if file_name.is_empty() || bytes.is_empty() {
                continue;
            }
            submission.files.push(NewImage {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(bad_request)?;
        let form = &mut submission.form;
        match name.as_str() {
            "name" => form.name = value,
            "description" => form.description = value,
            "price" => form.price = value,
            "stock" => form.stock = value,
            "category" => form.category = value,
            "brand" => form.brand = value,
            "existing_images" if !value.trim().is_empty() => form.images.push(value),
            _ => {}
        }
    }

    Ok(submission)
}

/// Upload new files in order and return their URLs.
async fn upload_images(
    state: &AppState,
    token: &ApiToken,
    files: Vec<NewImage>,
) -> std::result::Result<Vec<String>, crate::api::ApiError> {
    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let url = state
            .api()
            .upload_image(token, &file.file_name, &file.content_type, file.bytes)
            .await?;
        urls.push(url);
    }
    Ok(urls)
}

async fn render_form(
    session: &Session,
    nonce: CspNonce,
    product_id: Option<&ProductId>,
    form: ProductForm,
    errors: FieldErrors,
) -> Result<Response> {
    Ok(ProductFormTemplate::new(Layout::load(session, nonce).await?, product_id, form, errors)
        .into_response())
}

/// Validate, upload, and save a submission.
///
/// Returns the redirect on success, or the re-rendered form. Images that
/// were uploaded before a failed save stay on the re-rendered form.
async fn save_product(
    state: &AppState,
    session: &Session,
    nonce: CspNonce,
    admin: &SessionUser,
    product_id: Option<&ProductId>,
    submission: ProductSubmission,
) -> Result<Response> {
    let ProductSubmission { mut form, files } = submission;

    let mut input = match form.validate(files.len()) {
        Ok(input) => input,
        Err(errors) => {
            toast_error(session, "Please fix the errors in the form").await?;
            return render_form(session, nonce, product_id, form, errors).await;
        }
    };

    match upload_images(state, &admin.token, files).await {
        Ok(urls) => {
            form.images.extend(urls.iter().cloned());
            input.images.extend(urls);
        }
        Err(e) => {
            tracing::warn!(error = %e, "Image upload failed");
            toast_api_error(session, e).await?;
            return render_form(session, nonce, product_id, form, FieldErrors::new()).await;
        }
    }

    let result = match product_id {
        Some(id) => state.api().update_product(&admin.token, id, &input).await,
        None => state.api().create_product(&admin.token, &input).await,
    };

    match result {
        Ok(()) => {
            tracing::info!(product_id = ?product_id, "Product saved");
            let message = if product_id.is_some() {
                "Product updated successfully"
            } else {
                "Product created successfully"
            };
            toast_success(session, message).await?;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to save product");
            toast_api_error(session, e).await?;
            render_form(session, nonce, product_id, form, FieldErrors::new()).await
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product table.
#[instrument(skip(state, session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let (products, page, pages, error) =
        match state.api().admin_products(&admin.token, query.page).await {
            Ok(listing) => (
                listing
                    .items
                    .iter()
                    .map(ProductRowView::from)
                    .collect::<Vec<_>>(),
                listing.page,
                listing.pages,
                None,
            ),
            Err(e) => (Vec::new(), 1, 1, Some(inline_api_error(e)?)),
        };

    Ok(AdminProductsTemplate {
        layout: Layout::load(&session, nonce).await?,
        products,
        pagination: Pagination::new(page, pages, "/admin/products", &[]),
        error,
    }
    .into_response())
}

/// Display the empty product form.
#[instrument(skip(session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn new_page(
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Response> {
    render_form(&session, nonce, None, ProductForm::default(), FieldErrors::new()).await
}

/// Create a product.
#[instrument(skip(state, session, nonce, admin, multipart), fields(admin_id = %admin.info.id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    multipart: Multipart,
) -> Result<Response> {
    let submission = read_submission(multipart).await?;
    save_product(&state, &session, nonce, &admin, None, submission).await
}

/// Display the product form filled from an existing product.
#[instrument(skip(state, session, nonce, admin), fields(admin_id = %admin.info.id))]
pub async fn edit_page(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.api().get_product(&id).await?;

    render_form(
        &session,
        nonce,
        Some(&id),
        ProductForm::from_product(&product),
        FieldErrors::new(),
    )
    .await
}

/// Update a product.
#[instrument(skip(state, session, nonce, admin, multipart), fields(admin_id = %admin.info.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let id: ProductId = parse_id(&id, "product")?;
    let submission = read_submission(multipart).await?;
    save_product(&state, &session, nonce, &admin, Some(&id), submission).await
}

/// Delete a product.
#[instrument(skip(state, session, admin), fields(admin_id = %admin.info.id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: ProductId = parse_id(&id, "product")?;

    match state.api().delete_product(&admin.token, &id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product deleted");
            toast_success(&session, "Product deleted successfully").await?;
        }
        Err(e) => toast_api_error(&session, e).await?,
    }
    Ok(Redirect::to("/admin/products").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn template(product_id: Option<&str>) -> ProductFormTemplate {
        let id = product_id.map(|id| ProductId::parse(id).unwrap());
        ProductFormTemplate::new(
            Layout::default(),
            id.as_ref(),
            ProductForm::default(),
            FieldErrors::new(),
        )
    }

    #[test]
    fn test_form_action() {
        assert_eq!(template(None).action(), "/admin/products/create");
        assert!(!template(None).is_edit());
        assert_eq!(template(Some("p1")).action(), "/admin/products/p1/edit");
    }

    #[test]
    fn test_row_view() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "64f1c2aa90b1d3e4f5a6b7c8",
            "name": "Lamp",
            "price": 12,
            "category": "Home",
            "brand": "Sony",
            "stock": 3
        }))
        .unwrap();
        let row = ProductRowView::from(&product);
        assert_eq!(row.short_id, "a6b7c8");
        assert_eq!(row.price, "$12.00");
    }
}
