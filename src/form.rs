use log::debug;

use crate::{
    catalog,
    model::{ChairLine, CraneTruck, CustomerField, CustomerInfo, ProductLine, Quantity},
};

/// Снимок всех данных формы.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub customer: CustomerInfo,

    /// Товары в порядке каталога.
    pub products: Vec<ProductLine>,

    /// Стулья в порядке возрастания размера.
    pub chairs: Vec<ChairLine>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            customer: CustomerInfo::default(),
            products: catalog::PRODUCTS
                .iter()
                .map(|p| ProductLine {
                    product: *p,
                    quantity: Quantity::default(),
                })
                .collect(),
            chairs: catalog::CHAIR_SIZES
                .iter()
                .map(|s| ChairLine {
                    size: *s,
                    quantity: Quantity::default(),
                })
                .collect(),
        }
    }
}

impl FormState {
    /// Возвращает новый снимок с изменённым полем клиента.
    pub fn with_customer_field(&self, field: CustomerField, value: &str) -> Self {
        let mut customer = self.customer.clone();
        let value = value.to_owned();

        match field {
            CustomerField::CompanyName => customer.company_name = value,
            CustomerField::ContactPerson => customer.contact_person = value,
            CustomerField::Phone => customer.phone = value,
            CustomerField::Email => customer.email = value,
            CustomerField::DeliveryAddress => customer.delivery_address = value,
            CustomerField::DeliveryDate => customer.delivery_date = value,
            CustomerField::DeliveryTime => customer.delivery_time = value,
            // Всё, что не YES/NO, сбрасывает выбор.
            CustomerField::CraneTruck => customer.crane_truck = value.parse::<CraneTruck>().ok(),
        }

        Self {
            customer,
            ..self.clone()
        }
    }

    /// Возвращает новый снимок с изменённым количеством товара.
    /// Неизвестный идентификатор ничего не меняет.
    pub fn with_product_quantity(&self, id: u32, quantity: &str) -> Self {
        let products = self
            .products
            .iter()
            .map(|line| {
                if line.product.id == id {
                    ProductLine {
                        product: line.product,
                        quantity: Quantity::parse(quantity),
                    }
                } else {
                    line.clone()
                }
            })
            .collect();

        Self {
            products,
            ..self.clone()
        }
    }

    /// Возвращает новый снимок с изменённым количеством стульев.
    /// Неизвестный размер ничего не меняет.
    pub fn with_chair_quantity(&self, size: u32, quantity: &str) -> Self {
        let chairs = self
            .chairs
            .iter()
            .map(|line| {
                if line.size == size {
                    ChairLine {
                        size,
                        quantity: Quantity::parse(quantity),
                    }
                } else {
                    line.clone()
                }
            })
            .collect();

        Self {
            chairs,
            ..self.clone()
        }
    }
}

/// Хранилище состояния формы.
///
/// Единственный источник правды для интерфейса. Каждая мутация заменяет
/// снимок целиком и не может завершиться ошибкой.
#[derive(Debug, Default)]
pub struct FormStore {
    state: FormState,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущий снимок.
    pub fn snapshot(&self) -> &FormState {
        &self.state
    }

    pub fn set_customer_field(&mut self, field: CustomerField, value: &str) {
        debug!("Set customer field {} to {:?}", field, value);
        self.state = self.state.with_customer_field(field, value);
    }

    pub fn set_product_quantity(&mut self, id: u32, quantity: &str) {
        if catalog::product(id).is_none() {
            debug!("Ignore quantity for unknown product {}", id);
        }
        self.state = self.state.with_product_quantity(id, quantity);
    }

    pub fn set_chair_quantity(&mut self, size: u32, quantity: &str) {
        if !catalog::is_chair_size(size) {
            debug!("Ignore quantity for unknown chair size {}", size);
        }
        self.state = self.state.with_chair_quantity(size, quantity);
    }

    /// Возвращает форму к начальному состоянию.
    pub fn reset(&mut self) {
        debug!("Reset form");
        self.state = FormState::default();
    }
}
