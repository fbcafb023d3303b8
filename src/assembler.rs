use crate::{
    form::FormState,
    model::{CustomerInfo, DeliveryRecord, OrderItem},
};

/// Переводит данные клиента в словарь документа и писем.
pub fn delivery_record(customer: &CustomerInfo) -> DeliveryRecord {
    DeliveryRecord {
        company_name: customer.company_name.trim().to_owned(),
        site_contact_name: customer.contact_person.trim().to_owned(),
        phone_number: customer.phone.trim().to_owned(),
        email: customer.email.trim().to_owned(),
        delivery_address: customer.delivery_address.trim().to_owned(),
        delivery_date: customer.delivery_date.trim().to_owned(),
        delivery_time: customer.delivery_time.trim().to_owned(),
        crane_truck: customer
            .crane_truck
            .map(|c| c.to_string())
            .unwrap_or_default(),
    }
}

/// Собирает позиции заказа: сначала товары в порядке каталога, затем стулья
/// по возрастанию размера. Позиции с пустым или нулевым количеством в заказ
/// не попадают.
pub fn order_items(state: &FormState) -> Vec<OrderItem> {
    let products = state
        .products
        .iter()
        .filter(|line| line.quantity.is_positive())
        .map(OrderItem::from_product);

    let chairs = state
        .chairs
        .iter()
        .filter(|line| line.quantity.is_positive())
        .map(OrderItem::from_chair);

    products.chain(chairs).collect()
}

/// Собирает всё, что нужно для оформления заказа, из снимка формы.
pub fn assemble(state: &FormState) -> (DeliveryRecord, Vec<OrderItem>) {
    (delivery_record(&state.customer), order_items(state))
}
