//! `SeaORM` active enums mapped to Postgres enum types.

use fambud_core::budget::TransactionType as DomainTransactionType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
pub enum TransactionType {
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
    #[sea_orm(string_value = "INCOME")]
    Income,
}

impl From<DomainTransactionType> for TransactionType {
    fn from(value: DomainTransactionType) -> Self {
        match value {
            DomainTransactionType::Expense => Self::Expense,
            DomainTransactionType::Income => Self::Income,
        }
    }
}

impl From<TransactionType> for DomainTransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Expense => Self::Expense,
            TransactionType::Income => Self::Income,
        }
    }
}
