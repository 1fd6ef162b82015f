//! Catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shopeasy_core::ProductId;

use super::{first_page, inline_api_error, lenient_page, parse_id, toast_api_error};
use crate::api::{Product, ProductQuery};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, RequireAuth};
use crate::models::{CartStore, toast_error, toast_success};
use crate::state::AppState;
use crate::views::{Layout, Pagination, Star, rating_stars};

/// Categories offered by the filter panel.
pub const CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Home", "Books", "Toys"];

/// Brands offered by the filter panel.
pub const BRANDS: [&str; 5] = ["Apple", "Samsung", "Nike", "Adidas", "Sony"];

/// Minimum-rating choices offered by the filter panel.
pub const RATINGS: [u8; 4] = [4, 3, 2, 1];

// =============================================================================
// View Types
// =============================================================================

/// Product card display data.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub original_price: Option<String>,
    pub image: String,
    pub stars: Vec<Star>,
    pub num_reviews: u32,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            original_price: product.discounted_from().map(|p| p.display()),
            image: product.primary_image(),
            stars: rating_stars(product.rating),
            num_reviews: product.num_reviews,
            in_stock: product.in_stock(),
        }
    }
}

/// Product detail display data.
#[derive(Debug, Clone)]
pub struct ProductDetailView {
    pub card: ProductCardView,
    pub category: String,
    pub brand: String,
    pub stock: u32,
    pub images: Vec<String>,
    pub selected_image: usize,
}

impl ProductDetailView {
    fn new(product: &Product, selected: usize) -> Self {
        let images = product.image_urls();
        let selected_image = if selected < images.len() { selected } else { 0 };
        Self {
            card: ProductCardView::from(product),
            category: product.category.clone(),
            brand: product.brand.clone(),
            stock: product.stock,
            images,
            selected_image,
        }
    }

    /// The image shown large.
    #[must_use]
    pub fn main_image(&self) -> &str {
        self.images
            .get(self.selected_image)
            .map_or(crate::api::DEFAULT_PRODUCT_IMAGE, String::as_str)
    }
}

// =============================================================================
// Query & Form Types
// =============================================================================

/// Listing query parameters, named as the backend names them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub min_price: String,
    #[serde(default)]
    pub max_price: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default = "first_page", deserialize_with = "lenient_page")]
    pub page: u32,
}

impl ListingQuery {
    fn filters(&self) -> ProductQuery {
        let set = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        ProductQuery {
            keyword: set(&self.keyword),
            category: set(&self.category),
            brand: set(&self.brand),
            min_price: set(&self.min_price),
            max_price: set(&self.max_price),
            rating: set(&self.rating),
        }
    }

    /// Whether any filter beyond the keyword is active.
    #[must_use]
    pub fn has_panel_filters(&self) -> bool {
        [
            &self.category,
            &self.brand,
            &self.min_price,
            &self.max_price,
            &self.rating,
        ]
        .iter()
        .any(|v| !v.trim().is_empty())
    }

    /// The listing with only the keyword kept.
    #[must_use]
    pub fn clear_filters_href(&self) -> String {
        let keyword = self.keyword.trim();
        if keyword.is_empty() {
            return "/products".to_string();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("keyword", keyword)
            .finish();
        format!("/products?{query}")
    }

    #[must_use]
    pub fn is_category(&self, category: impl AsRef<str>) -> bool {
        self.category.trim() == category.as_ref()
    }

    #[must_use]
    pub fn is_brand(&self, brand: impl AsRef<str>) -> bool {
        self.brand.trim() == brand.as_ref()
    }

    #[must_use]
    pub fn is_rating(&self, rating: impl std::fmt::Display) -> bool {
        self.rating.trim() == rating.to_string()
    }
}

/// Product detail query parameters.
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    #[serde(default, deserialize_with = "lenient_index")]
    pub image: usize,
}

/// Read a gallery index, treating anything unparseable as the first image.
fn lenient_index<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<usize>().ok()).unwrap_or(0))
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default, deserialize_with = "lenient_page")]
    pub quantity: u32,
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductListTemplate {
    pub layout: Layout,
    pub featured: Vec<ProductCardView>,
    pub products: Vec<ProductCardView>,
    pub pagination: Pagination,
    pub query: ListingQuery,
    pub categories: &'static [&'static str],
    pub brands: &'static [&'static str],
    pub ratings: &'static [u8],
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: ProductDetailView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing.
///
/// The first unfiltered page also shows the featured strip.
#[instrument(skip(state, session, nonce))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Query(query): Query<ListingQuery>,
) -> Result<Response> {
    let filters = query.filters();

    let (products, page, pages, error) = match state.api().list_products(&filters, query.page).await
    {
        Ok(listing) => (
            listing
                .items
                .iter()
                .map(ProductCardView::from)
                .collect::<Vec<_>>(),
            listing.page,
            listing.pages,
            None,
        ),
        Err(e) => (Vec::new(), 1, 1, Some(inline_api_error(e)?)),
    };

    let featured = if filters.is_empty() && page == 1 && error.is_none() {
        match state.api().top_products().await {
            Ok(top) => top.iter().map(ProductCardView::from).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load featured products");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let pagination = Pagination::new(page, pages, "/products", &filters.pairs());

    Ok(ProductListTemplate {
        layout: Layout::load(&session, nonce).await?,
        featured,
        products,
        pagination,
        query,
        categories: &CATEGORIES,
        brands: &BRANDS,
        ratings: &RATINGS,
        error,
    }
    .into_response())
}

/// Display a product.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    nonce: CspNonce,
    Path(id): Path<String>,
    Query(detail): Query<DetailQuery>,
) -> Result<Response> {
    let id: ProductId = parse_id(&id, "product")?;
    let product = state.api().get_product(&id).await?;

    Ok(ProductShowTemplate {
        layout: Layout::load(&session, nonce).await?,
        product: ProductDetailView::new(&product, detail.image),
    }
    .into_response())
}

/// Add a product to the cart, then show the cart.
#[instrument(skip(state, session, user), fields(user_id = %user.info.id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id: ProductId = parse_id(&id, "product")?;
    let back = format!("/product/{id}");

    let product = match state.api().get_product(&id).await {
        Ok(product) => product,
        Err(e) => {
            toast_api_error(&session, e).await?;
            return Ok(Redirect::to(&back).into_response());
        }
    };

    let Some(quantity) = product.clamp_quantity(form.quantity) else {
        toast_error(&session, "This product is out of stock").await?;
        return Ok(Redirect::to(&back).into_response());
    };

    if let Err(e) = state.api().add_to_cart(&user.token, &id, quantity).await {
        toast_api_error(&session, e).await?;
        return Ok(Redirect::to(&back).into_response());
    }

    match state.api().get_cart(&user.token).await {
        Ok(items) => CartStore::set_cart_items(&session, items).await?,
        Err(e) => tracing::warn!(error = %e, "Failed to refresh cart after add"),
    }
    toast_success(&session, "Added to cart").await?;
    Ok(Redirect::to("/cart").into_response())
}
