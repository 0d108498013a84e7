//! Shop application, shop and promotion handlers.
//!
//! ```text
//! POST /api/shop/apply {"shopName":"Bark & Co"}
//! GET /api/shop/application
//! GET /api/shop
//! GET /api/shop/mine
//! GET|PUT /api/shop/{id}
//! GET /api/promotion?shopId=<uuid>
//! POST /api/promotion {"title":"Spring sale","content":"20% off leads"}
//! DELETE /api/promotion/{id}
//! ```
//!
//! `/api/shop/mine` and `/api/shop/application` must be registered before
//! `/api/shop/{id}`.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, PromotionDraft, PromotionId, PromotionalPost, Shop, ShopApplication,
    ShopApplicationDraft, ShopId, ShopPatch, ShopPatchInput,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Shop application body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShopApplicationRequest {
    pub shop_name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl TryFrom<ShopApplicationRequest> for ShopApplicationDraft {
    type Error = Error;

    fn try_from(value: ShopApplicationRequest) -> Result<Self, Self::Error> {
        let shop_name = require(value.shop_name, FieldName::new("shopName"))?;
        Ok(Self::try_from_parts(
            &shop_name,
            value.description.as_deref(),
            value.address.as_deref(),
            value.phone.as_deref(),
        )?)
    }
}

/// Shop edit body. Empty strings clear optional fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
}

impl TryFrom<UpdateShopRequest> for ShopPatch {
    type Error = Error;

    fn try_from(value: UpdateShopRequest) -> Result<Self, Self::Error> {
        Ok(Self::try_new(ShopPatchInput {
            name: value.name.as_deref(),
            description: value.description.as_deref(),
            address: value.address.as_deref(),
            phone: value.phone.as_deref(),
            logo_url: value.logo_url.as_deref(),
        })?)
    }
}

/// Promotion body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<PromotionRequest> for PromotionDraft {
    type Error = Error;

    fn try_from(value: PromotionRequest) -> Result<Self, Self::Error> {
        let title = require(value.title, FieldName::new("title"))?;
        let content = require(value.content, FieldName::new("content"))?;
        Ok(Self::try_from_parts(
            &title,
            &content,
            value.image_url.as_deref(),
        )?)
    }
}

/// Promotion filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionParams {
    pub shop_id: Option<ShopId>,
}

/// Ask to open a shop.
#[utoipa::path(
    post,
    path = "/api/shop/apply",
    request_body = ShopApplicationRequest,
    responses(
        (status = 201, description = "Application filed", body = ShopApplication),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Already a shop owner or application pending", body = Error)
    ),
    tags = ["shops"],
    operation_id = "applyForShop"
)]
pub async fn apply(
    state: web::Data<HttpState>,
    current: CurrentUser,
    payload: web::Json<ShopApplicationRequest>,
) -> ApiResult<HttpResponse> {
    let draft = ShopApplicationDraft::try_from(payload.into_inner())?;
    let application = state.shops.apply(current.user(), draft).await?;
    Ok(HttpResponse::Created().json(application))
}

/// The caller's applications, newest first.
#[utoipa::path(
    get,
    path = "/api/shop/application",
    responses(
        (status = 200, description = "Applications", body = [ShopApplication]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["shops"],
    operation_id = "myShopApplications"
)]
pub async fn my_applications(
    state: web::Data<HttpState>,
    current: CurrentUser,
) -> ApiResult<web::Json<Vec<ShopApplication>>> {
    let applications = state.shops.my_applications(current.user()).await?;
    Ok(web::Json(applications))
}

/// All shops by name.
#[utoipa::path(
    get,
    path = "/api/shop",
    responses((status = 200, description = "Shops", body = [Shop])),
    tags = ["shops"],
    operation_id = "listShops",
    security([])
)]
pub async fn list_shops(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Shop>>> {
    let shops = state.shops.list_shops().await?;
    Ok(web::Json(shops))
}

/// The caller's shop.
#[utoipa::path(
    get,
    path = "/api/shop/mine",
    responses(
        (status = 200, description = "Shop", body = Shop),
        (status = 404, description = "Caller owns no shop", body = Error)
    ),
    tags = ["shops"],
    operation_id = "myShop"
)]
pub async fn my_shop(
    state: web::Data<HttpState>,
    current: CurrentUser,
) -> ApiResult<web::Json<Shop>> {
    let shop = state.shops.my_shop(current.user()).await?;
    Ok(web::Json(shop))
}

/// Fetch one shop.
#[utoipa::path(
    get,
    path = "/api/shop/{id}",
    params(("id" = ShopId, Path, description = "Shop identifier")),
    responses(
        (status = 200, description = "Shop", body = Shop),
        (status = 404, description = "Unknown shop", body = Error)
    ),
    tags = ["shops"],
    operation_id = "getShop",
    security([])
)]
pub async fn get_shop(
    state: web::Data<HttpState>,
    path: web::Path<ShopId>,
) -> ApiResult<web::Json<Shop>> {
    let shop = state.shops.get_shop(&path.into_inner()).await?;
    Ok(web::Json(shop))
}

/// Edit the caller's shop.
#[utoipa::path(
    put,
    path = "/api/shop/{id}",
    params(("id" = ShopId, Path, description = "Shop identifier")),
    request_body = UpdateShopRequest,
    responses(
        (status = 200, description = "Updated shop", body = Shop),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Unknown shop", body = Error)
    ),
    tags = ["shops"],
    operation_id = "updateShop"
)]
pub async fn update_shop(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<ShopId>,
    payload: web::Json<UpdateShopRequest>,
) -> ApiResult<web::Json<Shop>> {
    let patch = ShopPatch::try_from(payload.into_inner())?;
    let shop = state
        .shops
        .update_shop(current.user(), &path.into_inner(), patch)
        .await?;
    Ok(web::Json(shop))
}

/// Promotions, newest first.
#[utoipa::path(
    get,
    path = "/api/promotion",
    params(("shopId" = Option<ShopId>, Query, description = "Only this shop's promotions")),
    responses((status = 200, description = "Promotions", body = [PromotionalPost])),
    tags = ["shops"],
    operation_id = "listPromotions",
    security([])
)]
pub async fn list_promotions(
    state: web::Data<HttpState>,
    params: web::Query<PromotionParams>,
) -> ApiResult<web::Json<Vec<PromotionalPost>>> {
    let promotions = state.shops.list_promotions(params.shop_id).await?;
    Ok(web::Json(promotions))
}

/// Publish a promotion for the caller's shop.
#[utoipa::path(
    post,
    path = "/api/promotion",
    request_body = PromotionRequest,
    responses(
        (status = 201, description = "Promotion created", body = PromotionalPost),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller owns no shop", body = Error)
    ),
    tags = ["shops"],
    operation_id = "createPromotion"
)]
pub async fn create_promotion(
    state: web::Data<HttpState>,
    current: CurrentUser,
    payload: web::Json<PromotionRequest>,
) -> ApiResult<HttpResponse> {
    let draft = PromotionDraft::try_from(payload.into_inner())?;
    let promotion = state.shops.create_promotion(current.user(), draft).await?;
    Ok(HttpResponse::Created().json(promotion))
}

/// Remove a promotion.
#[utoipa::path(
    delete,
    path = "/api/promotion/{id}",
    params(("id" = PromotionId, Path, description = "Promotion identifier")),
    responses(
        (status = 204, description = "Promotion removed"),
        (status = 403, description = "Neither shop owner nor admin", body = Error),
        (status = 404, description = "Unknown promotion", body = Error)
    ),
    tags = ["shops"],
    operation_id = "deletePromotion"
)]
pub async fn delete_promotion(
    state: web::Data<HttpState>,
    current: CurrentUser,
    path: web::Path<PromotionId>,
) -> ApiResult<HttpResponse> {
    state
        .shops
        .delete_promotion(current.user(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
