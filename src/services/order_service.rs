use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderItemInput, OrderListQuery, UpdateOrderStatusRequest},
    entity::{OrderItems, Orders, order_items, orders, orders::OrderStatus},
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderWithItems},
    notify::Notification,
    response::{Meta, Paginated},
    state::AppState,
};

/// Order totals snapshot the submitted unit prices; nothing is re-read
/// from the catalog here. Checked arithmetic keeps absurd submitted
/// prices a 400 instead of an overflow.
pub fn compute_total(items: &[OrderItemInput]) -> AppResult<Decimal> {
    let mut total = Decimal::ZERO;
    for item in items {
        total = item
            .price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| AppError::BadRequest("Order total is out of range".into()))?;
    }
    Ok(total)
}

/// Persist an order and its lines atomically and return the wire shapes.
/// Both the direct path (PENDING) and the paid checkout path (COMPLETED)
/// come through here.
pub async fn persist_order(
    state: &AppState,
    payload: &CreateOrderRequest,
    status: OrderStatus,
) -> AppResult<(Order, Vec<OrderItem>)> {
    let total = compute_total(&payload.items)?;
    let txn = state.orm.begin().await?;

    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_name: Set(payload.customer_name.clone()),
        customer_phone: Set(payload.customer_phone.clone()),
        customer_email: Set(payload.email()),
        total: Set(total),
        status: Set(status),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let line = order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(Some(item.menu_item_id)),
            name: Set(item.name.clone()),
            price: Set(item.price),
            quantity: Set(item.quantity),
            created_at: NotSet,
        }
        .insert(&txn)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                AppError::BadRequest("Unknown menu item".into())
            }
            _ => AppError::from(err),
        })?;
        items.push(OrderItem::from(line));
    }

    txn.commit().await?;
    Ok((order.into(), items))
}

/// Direct order placement: persist as PENDING, then queue the
/// confirmation email.
pub async fn create_order(state: &AppState, payload: CreateOrderRequest) -> AppResult<Order> {
    let (order, items) = persist_order(state, &payload, OrderStatus::Pending).await?;
    state.notifier.notify(Notification::Order {
        order: order.clone(),
        items,
    });
    Ok(order)
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<Paginated<OrderWithItems>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut finder = Orders::find().order_by_desc(orders::Column::CreatedAt);
    if let Some(status) = query.status {
        finder = finder.filter(orders::Column::Status.eq(status));
    }

    let total = finder.clone().count(&state.orm).await? as i64;
    let page_rows = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = page_rows.iter().map(|order| order.id).collect();
    let mut lines: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if !ids.is_empty() {
        let rows = OrderItems::find()
            .filter(order_items::Column::OrderId.is_in(ids))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(&state.orm)
            .await?;
        for row in rows {
            lines.entry(row.order_id).or_default().push(row.into());
        }
    }

    let items = page_rows
        .into_iter()
        .map(|order| {
            let items = lines.remove(&order.id).unwrap_or_default();
            OrderWithItems {
                order: order.into(),
                items,
            }
        })
        .collect();

    Ok(Paginated::new(items, Meta::new(page, per_page, total)))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<OrderWithItems> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(order) => order,
        None => return Err(AppError::NotFound),
    };
    let items = order_lines(&state.orm, order.id).await?;
    Ok(OrderWithItems {
        order: order.into(),
        items,
    })
}

/// Admin status transition. Illegal moves are refused; the customer is
/// mailed about every accepted change.
pub async fn update_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<OrderWithItems> {
    let order = Orders::find_by_id(id).one(&state.orm).await?;
    let order = match order {
        Some(order) => order,
        None => return Err(AppError::NotFound),
    };

    if !order.status.can_transition_to(payload.status) {
        return Err(AppError::BadRequest(format!(
            "Cannot change status from {} to {}",
            order.status.as_str(),
            payload.status.as_str()
        )));
    }

    let mut active: orders::ActiveModel = order.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    let items = order_lines(&state.orm, order.id).await?;
    let order = Order::from(order);
    state.notifier.notify(Notification::Order {
        order: order.clone(),
        items: items.clone(),
    });

    Ok(OrderWithItems { order, items })
}

async fn order_lines<C: ConnectionTrait>(conn: &C, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    let items = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .order_by_asc(order_items::Column::CreatedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    Ok(items)
}
