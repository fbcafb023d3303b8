/// Позиция из фиксированного каталога товаров.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Стабильный идентификатор позиции.
    pub id: u32,

    /// Название для отображения.
    pub name: &'static str,

    /// Уточнение (размер, длина и т.п.). Есть не у всех позиций.
    pub detail: Option<&'static str>,

    /// Единица измерения.
    pub unit: &'static str,
}

pub const PRODUCTS: [Product; 9] = [
    Product { id: 1, name: "PC Strand", detail: Some("12.7mm"), unit: "Ton" },
    Product { id: 2, name: "Anchor Block and Wedges", detail: None, unit: "Set" },
    Product { id: 3, name: "Duct", detail: Some("Duct (70 x 20mm) 3,770m"), unit: "M" },
    Product { id: 4, name: "Jack Wedge", detail: Some("12.7mm Jack Wedges"), unit: "Set" },
    Product { id: 5, name: "Duct Tape", detail: None, unit: "Roll" },
    Product { id: 6, name: "Grout Tube", detail: None, unit: "Roll" },
    Product { id: 7, name: "AbleFlex", detail: None, unit: "Roll" },
    Product { id: 8, name: "Round Corrugate Duct", detail: None, unit: "M" },
    Product { id: 9, name: "Staple", detail: None, unit: "Box" },
];

/// Название, под которым стулья попадают в заказ.
pub const CHAIR_NAME: &str = "Chair";

/// Стулья всегда заказываются мешками.
pub const CHAIR_UNIT: &str = "bag";

/// Номинальные размеры стульев в миллиметрах, по возрастанию.
pub const CHAIR_SIZES: [u32; 47] = [
    25, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120, 130, 140, 150, 160, 170, 180, 190, 200, 210,
    220, 230, 240, 250, 260, 270, 280, 290, 300, 310, 320, 330, 340, 350, 360, 370, 380, 390, 400,
    410, 420, 430, 440, 450, 460, 470, 480,
];

/// Заглушка для колонки "Detail", когда уточнения нет.
pub const DETAIL_PLACEHOLDER: &str = "N/A";

/// Вариант времени доставки: значение уходит в заказ, подпись видит клиент.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTimeOption {
    pub value: &'static str,
    pub label: &'static str,
}

impl std::fmt::Display for DeliveryTimeOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub const DELIVERY_TIMES: [DeliveryTimeOption; 20] = [
    DeliveryTimeOption { value: "anytime", label: "Anytime 7am to 3pm" },
    DeliveryTimeOption { value: "morning-anytime", label: "Morning Anytime" },
    DeliveryTimeOption { value: "7:00", label: "7:00" },
    DeliveryTimeOption { value: "7:30", label: "7:30" },
    DeliveryTimeOption { value: "8:00", label: "8:00" },
    DeliveryTimeOption { value: "8:30", label: "8:30" },
    DeliveryTimeOption { value: "9:00", label: "9:00" },
    DeliveryTimeOption { value: "9:30", label: "9:30" },
    DeliveryTimeOption { value: "10:00", label: "10:00" },
    DeliveryTimeOption { value: "10:30", label: "10:30" },
    DeliveryTimeOption { value: "11:00", label: "11:00" },
    DeliveryTimeOption { value: "11:30", label: "11:30" },
    DeliveryTimeOption { value: "afternoon-anytime", label: "Afternoon Anytime" },
    DeliveryTimeOption { value: "12:00", label: "12:00" },
    DeliveryTimeOption { value: "12:30", label: "12:30" },
    DeliveryTimeOption { value: "13:00", label: "1:00" },
    DeliveryTimeOption { value: "13:30", label: "1:30" },
    DeliveryTimeOption { value: "14:00", label: "2:00" },
    DeliveryTimeOption { value: "14:30", label: "2:30" },
    DeliveryTimeOption { value: "15:00", label: "3:00" },
];

/// Ищет товар по идентификатору.
pub fn product(id: u32) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}

pub fn is_chair_size(size: u32) -> bool {
    CHAIR_SIZES.contains(&size)
}

pub fn is_delivery_time(value: &str) -> bool {
    DELIVERY_TIMES.iter().any(|o| o.value == value)
}
