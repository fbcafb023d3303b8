use std::{collections::BTreeMap, fs, io, path::Path};

use serde::Deserialize;

use crate::{catalog, form::FormStore, model::CustomerField};

/// Заказ, заранее подготовленный в файле.
///
/// Поля клиента задаются по имени, количества товаров по идентификатору,
/// количества стульев по размеру.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OrderFile {
    pub customer: BTreeMap<String, String>,
    pub products: BTreeMap<u32, QuantityValue>,
    pub chairs: BTreeMap<u32, QuantityValue>,
}

/// Количество можно записать и числом, и строкой.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum QuantityValue {
    Number(serde_json::Number),
    Text(String),
}

impl std::fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl OrderFile {
    /// Переносит значения из файла в форму так же, как их ввёл бы
    /// пользователь.
    pub fn apply(&self, form: &mut FormStore) -> ApplyResult {
        for (name, value) in self.customer.iter() {
            let field: CustomerField = name
                .parse()
                .map_err(|_| ApplyError::UnknownField(name.clone()))?;
            form.set_customer_field(field, value);
        }

        for (id, quantity) in self.products.iter() {
            if catalog::product(*id).is_none() {
                return Err(ApplyError::UnknownProduct(*id));
            }
            form.set_product_quantity(*id, &quantity.to_string());
        }

        for (size, quantity) in self.chairs.iter() {
            if !catalog::is_chair_size(*size) {
                return Err(ApplyError::UnknownChairSize(*size));
            }
            form.set_chair_quantity(*size, &quantity.to_string());
        }

        Ok(())
    }
}

/// Загружает заказ из JSON файла.
pub fn load(path: &Path) -> LoadResult {
    let content = fs::read_to_string(path)?;

    let order: OrderFile = serde_json::from_str(&content)?;

    Ok(order)
}

pub type LoadResult = std::result::Result<OrderFile, LoadError>;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("read order file")]
    ReadFile(#[from] io::Error),

    #[error("deserialize")]
    Deserialize(#[from] serde_json::Error),
}

pub type ApplyResult = std::result::Result<(), ApplyError>;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ApplyError {
    #[error("unknown customer field \"{0}\"")]
    UnknownField(String),

    #[error("unknown product id {0}")]
    UnknownProduct(u32),

    #[error("unknown chair size {0}")]
    UnknownChairSize(u32),
}
