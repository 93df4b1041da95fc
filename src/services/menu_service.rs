use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::menu::{
        CreateCategoryRequest, CreateMenuItemRequest, UpdateCategoryRequest,
        UpdateMenuItemRequest,
    },
    entity::{MenuCategories, MenuItems, menu_categories, menu_items},
    error::{AppError, AppResult},
    models::{MenuCategory, MenuItem, MenuItemWithCategory, MenuSection},
    response::{Meta, Paginated},
    routes::params::Pagination,
    state::AppState,
};

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder-food.jpg";

/// Public menu: categories in display order, each carrying only its
/// available items. Categories without available items still appear.
pub async fn public_menu(state: &AppState) -> AppResult<Vec<MenuSection>> {
    let categories = MenuCategories::find()
        .order_by_asc(menu_categories::Column::SortOrder)
        .all(&state.orm)
        .await?;

    let items = MenuItems::find()
        .filter(menu_items::Column::IsAvailable.eq(true))
        .order_by_asc(menu_items::Column::Name)
        .all(&state.orm)
        .await?;

    let mut by_category: HashMap<Uuid, Vec<MenuItem>> = HashMap::new();
    for item in items {
        by_category
            .entry(item.category_id)
            .or_default()
            .push(item.into());
    }

    let sections = categories
        .into_iter()
        .map(|category| MenuSection {
            items: by_category.remove(&category.id).unwrap_or_default(),
            id: category.id,
            name: category.name,
            slug: category.slug,
            sort_order: category.sort_order,
            image: category.image,
        })
        .collect();

    Ok(sections)
}

/// Back-office listing: every item regardless of availability, most
/// recently edited first, with the owning category attached.
pub async fn list_items(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<Paginated<MenuItemWithCategory>> {
    let (page, per_page, offset) = pagination.normalize();

    let finder = MenuItems::find().order_by_desc(menu_items::Column::UpdatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .find_also_related(MenuCategories)
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let mut items = Vec::with_capacity(rows.len());
    for (item, category) in rows {
        let category = category.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("menu item {} has no category", item.id))
        })?;
        items.push(MenuItemWithCategory {
            item: item.into(),
            category: category.into(),
        });
    }

    Ok(Paginated::new(items, Meta::new(page, per_page, total)))
}

pub async fn create_item(
    state: &AppState,
    payload: CreateMenuItemRequest,
) -> AppResult<MenuItem> {
    let category = MenuCategories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?;
    if category.is_none() {
        return Err(AppError::BadRequest("Unknown category".into()));
    }

    let image = payload
        .image
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    let active = menu_items::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        name: Set(payload.name),
        description: Set(payload.description),
        price: Set(payload.price),
        is_veg: Set(payload.is_veg),
        spice_level: Set(payload.spice_level),
        image: Set(image),
        is_available: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let item = active.insert(&state.orm).await?;
    Ok(item.into())
}

pub async fn update_item(
    state: &AppState,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<MenuItem> {
    let existing = MenuItems::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(item) => item,
        None => return Err(AppError::NotFound),
    };

    if let Some(category_id) = payload.category_id {
        let category = MenuCategories::find_by_id(category_id)
            .one(&state.orm)
            .await?;
        if category.is_none() {
            return Err(AppError::BadRequest("Unknown category".into()));
        }
    }

    let mut active: menu_items::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(is_veg) = payload.is_veg {
        active.is_veg = Set(is_veg);
    }
    if let Some(spice_level) = payload.spice_level {
        active.spice_level = Set(spice_level);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(is_available) = payload.is_available {
        active.is_available = Set(is_available);
    }
    active.updated_at = Set(Utc::now().into());

    let item = active.update(&state.orm).await?;
    Ok(item.into())
}

pub async fn delete_item(state: &AppState, id: Uuid) -> AppResult<()> {
    let result = MenuItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub async fn list_categories(state: &AppState) -> AppResult<Vec<MenuCategory>> {
    let categories = MenuCategories::find()
        .order_by_asc(menu_categories::Column::SortOrder)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(MenuCategory::from)
        .collect();
    Ok(categories)
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<MenuCategory> {
    let taken = MenuCategories::find()
        .filter(menu_categories::Column::Slug.eq(payload.slug.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::BadRequest("Slug is already taken".into()));
    }

    let active = menu_categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        slug: Set(payload.slug),
        sort_order: Set(payload.sort_order.unwrap_or(0)),
        image: Set(payload.image.filter(|i| !i.is_empty())),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let category = active.insert(&state.orm).await?;
    Ok(category.into())
}

pub async fn update_category(
    state: &AppState,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<MenuCategory> {
    let existing = MenuCategories::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(category) => category,
        None => return Err(AppError::NotFound),
    };

    if let Some(slug) = payload.slug.as_ref() {
        let taken = MenuCategories::find()
            .filter(menu_categories::Column::Slug.eq(slug.as_str()))
            .filter(menu_categories::Column::Id.ne(id))
            .one(&state.orm)
            .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest("Slug is already taken".into()));
        }
    }

    let mut active: menu_categories::ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(slug) = payload.slug {
        active.slug = Set(slug);
    }
    if let Some(sort_order) = payload.sort_order {
        active.sort_order = Set(sort_order);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image).filter(|i| !i.is_empty()));
    }
    active.updated_at = Set(Utc::now().into());

    let category = active.update(&state.orm).await?;
    Ok(category.into())
}

/// Deleting a category that still owns items is refused so the public menu
/// never loses items by accident.
pub async fn delete_category(state: &AppState, id: Uuid) -> AppResult<()> {
    let in_use = MenuItems::find()
        .filter(menu_items::Column::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::BadRequest(
            "Category still has menu items".into(),
        ));
    }

    let result = MenuCategories::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
