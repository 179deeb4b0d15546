use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        users::{Entity as Users, Model as UserModel},
    },
    error::AppResult,
    state::AppState,
};

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Dispatched(OrderModel),
    AlreadyDispatched(OrderModel),
    NotFound,
}

pub async fn get_order_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<Option<OrderModel>> {
    Ok(Orders::find_by_id(id).one(conn).await?)
}

pub async fn get_orders_to_dispatch<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Vec<(OrderModel, Option<UserModel>)>> {
    Ok(Orders::find()
        .filter(OrderCol::IsDispatched.eq(false))
        .order_by_asc(OrderCol::CreatedAt)
        .find_also_related(Users)
        .all(conn)
        .await?)
}

pub async fn get_orders_by_user_id<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<Vec<OrderModel>> {
    Ok(Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .all(conn)
        .await?)
}

pub async fn delete_orders_by_user_id<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> AppResult<u64> {
    let result = Orders::delete_many()
        .filter(OrderCol::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

// Not-dispatched to dispatched is the only transition.
pub async fn dispatch_order(state: &AppState, id: Uuid) -> AppResult<DispatchOutcome> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Ok(DispatchOutcome::NotFound),
    };

    if order.is_dispatched {
        txn.commit().await?;
        return Ok(DispatchOutcome::AlreadyDispatched(order));
    }

    let mut active: OrderActive = order.into();
    active.is_dispatched = Set(true);
    active.dispatched_date = Set(Some(Utc::now().into()));
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, "order dispatched");
    Ok(DispatchOutcome::Dispatched(order))
}
