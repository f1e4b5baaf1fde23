use super::{NewUser, StoreError, StoredTrade, TradeStore, User, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{query, Pool, Postgres, Row};
use trading::{BrokerType, Outcome, TradeLeg, TradeType, UnifiedTrade};

const SCHEMA: [&str; 2] = [
    r#"
    create table if not exists users (
        id              text primary key,
        username        text not null unique,
        email           text not null unique,
        password_hash   text not null,
        first_name      text,
        last_name       text,
        brokers         text[] not null default '{}',
        created_at      timestamptz not null default now()
    )
    "#,
    r#"
    create table if not exists trade_logs (
        id              bigserial primary key,
        user_id         text not null references users (id),
        trade_id        text not null,
        broker_type     text not null,
        symbol          text not null,
        quantity        double precision not null,
        price           double precision not null,
        executed_at     timestamptz not null,
        original_data   jsonb not null,
        trade_type      text not null,
        profit_loss     double precision,
        is_win          boolean,
        duration        bigint,
        created_at      timestamptz not null default now(),
        unique (trade_id, broker_type, user_id)
    )
    "#,
];

/// Postgres-backed store.
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    /// Connects and creates the tables if they do not exist.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        for statement in SCHEMA {
            query(statement).execute(&pool).await?;
        }
        info!("Database schema ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl TradeStore for PgStore {
    async fn upsert_trades(&self, user_id: &str, legs: &[TradeLeg]) -> Result<usize, StoreError> {
        let q = r#"
            insert into trade_logs (
                user_id, trade_id, broker_type, symbol, quantity, price,
                executed_at, original_data, trade_type, profit_loss, is_win, duration
            ) values (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12
            )
            on conflict (trade_id, broker_type, user_id) do update set
                trade_type = excluded.trade_type,
                profit_loss = excluded.profit_loss,
                is_win = excluded.is_win,
                duration = excluded.duration
            returning (xmax = 0) as inserted
            "#;

        let mut inserted = 0;
        for leg in legs {
            let trade = &leg.trade;
            let outcome = leg.outcome.as_ref();
            let row = query(q)
                .bind(user_id)
                .bind(&trade.id)
                .bind(trade.broker_type.code())
                .bind(&trade.symbol)
                .bind(trade.quantity)
                .bind(trade.price)
                .bind(trade.timestamp)
                .bind(&trade.original_data)
                .bind(leg.trade_type.as_str())
                .bind(outcome.map(|o| o.profit_loss))
                .bind(outcome.map(|o| o.is_win))
                .bind(outcome.map(|o| o.duration))
                .fetch_one(&self.pool)
                .await?;
            // xmax is zero only for freshly inserted rows
            if row.try_get::<bool, _>("inserted")? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn list_trades(&self, user_id: &str) -> Result<Vec<StoredTrade>, StoreError> {
        let q = r#"
            select
                user_id, trade_id, broker_type, symbol, quantity, price, executed_at,
                original_data, trade_type, profit_loss, is_win, duration, created_at
            from trade_logs
            where user_id = $1
            order by executed_at, id
            "#;

        let rows = query(q).bind(user_id).fetch_all(&self.pool).await?;
        rows.iter().map(stored_trade).collect()
    }
}

fn stored_trade(row: &PgRow) -> Result<StoredTrade, StoreError> {
    let broker: String = row.try_get("broker_type")?;
    let broker_type = broker
        .parse::<BrokerType>()
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    let side: String = row.try_get("trade_type")?;
    let trade_type = TradeType::parse(&side)
        .ok_or_else(|| StoreError::Corrupt(format!("Unknown trade type: {}", side)))?;

    let profit_loss: Option<f64> = row.try_get("profit_loss")?;
    let is_win: Option<bool> = row.try_get("is_win")?;
    let duration: Option<i64> = row.try_get("duration")?;
    let outcome = match (profit_loss, is_win, duration) {
        (Some(profit_loss), Some(is_win), Some(duration)) => Some(Outcome {
            profit_loss,
            is_win,
            duration,
        }),
        _ => None,
    };

    Ok(StoredTrade {
        trade: UnifiedTrade {
            id: row.try_get("trade_id")?,
            symbol: row.try_get("symbol")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            timestamp: row.try_get("executed_at")?,
            broker_type,
            original_data: row.try_get("original_data")?,
        },
        user: row.try_get("user_id")?,
        trade_type,
        outcome,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let q = r#"
            insert into users (id, username, email, password_hash, first_name, last_name, brokers)
            values ($1, $2, $3, $4, $5, $6, $7)
            on conflict do nothing
            returning created_at
            "#;

        let id = uuid::Uuid::new_v4().to_string();
        let codes: Vec<String> = user.brokers.iter().map(|b| b.code().to_string()).collect();
        let row = query(q)
            .bind(&id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&codes)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let created_at: DateTime<Utc> = row.try_get("created_at")?;
                Ok(user.into_user(id, created_at))
            }
            None => Err(StoreError::Conflict),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let q = r#"
            select id, username, email, password_hash, first_name, last_name, brokers, created_at
            from users
            where username = $1
            "#;

        let Some(row) = query(q).bind(username).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        let codes: Vec<String> = row.try_get("brokers")?;
        Ok(Some(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            // codes of since-removed brokers are dropped
            brokers: codes.iter().filter_map(|c| c.parse().ok()).collect(),
            created_at: row.try_get("created_at")?,
        }))
    }
}
