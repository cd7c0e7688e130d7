//! Initial schema: budgets and the three tables that carry a budget id.
//!
//! Child tables reference `budgets` without `ON DELETE CASCADE`; deleting a
//! budget is done child-first by the aggregate service. `category_id` has no
//! foreign key, so a deleted category can leave dangling references.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
CREATE TYPE transaction_type AS ENUM ('EXPENSE', 'INCOME');

CREATE TABLE budgets (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL
);

CREATE TABLE categories (
    id BIGSERIAL PRIMARY KEY,
    budget_id BIGINT NOT NULL REFERENCES budgets(id),
    name VARCHAR(255) NOT NULL
);

CREATE INDEX idx_categories_budget ON categories(budget_id);

CREATE TABLE transactors (
    id BIGSERIAL PRIMARY KEY,
    budget_id BIGINT NOT NULL REFERENCES budgets(id),
    first_name VARCHAR(255) NOT NULL,
    last_name VARCHAR(255) NOT NULL,
    email VARCHAR(255)
);

CREATE INDEX idx_transactors_budget ON transactors(budget_id);

CREATE TABLE transactions (
    id BIGSERIAL PRIMARY KEY,
    budget_id BIGINT NOT NULL REFERENCES budgets(id),
    category_id BIGINT,
    transactor_id BIGINT,
    description TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    date DATE NOT NULL,
    type transaction_type NOT NULL
);

CREATE INDEX idx_transactions_budget ON transactions(budget_id);
CREATE INDEX idx_transactions_budget_date ON transactions(budget_id, date);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS transactors;
DROP TABLE IF EXISTS categories;
DROP TABLE IF EXISTS budgets;
DROP TYPE IF EXISTS transaction_type;
";
