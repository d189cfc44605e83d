use super::dto::{FoodItem, PerSize};

/// Built-in catalog used when nothing has been stored yet.
pub fn default_catalog() -> Vec<FoodItem> {
    vec![
        FoodItem {
            id: "1".into(),
            name: "Classic Burger".into(),
            description: "Juicy beef patty with fresh vegetables and special sauce".into(),
            price: PerSize::new(8.99, 12.99),
            weight: PerSize::new("200g".into(), "300g".into()),
            image: "https://images.unsplash.com/photo-1568901346375-23c9450c58cd?q=80&w=1000&auto=format&fit=crop".into(),
            available: PerSize::new(10, 8),
        },
        FoodItem {
            id: "2".into(),
            name: "Margherita Pizza".into(),
            description: "Fresh tomatoes, mozzarella, and basil on our signature crust".into(),
            price: PerSize::new(10.99, 15.99),
            weight: PerSize::new("400g".into(), "600g".into()),
            image: "https://images.unsplash.com/photo-1604382354936-07c5d9983bd3?q=80&w=1000&auto=format&fit=crop".into(),
            available: PerSize::new(15, 12),
        },
        FoodItem {
            id: "3".into(),
            name: "Caesar Salad".into(),
            description: "Crisp romaine lettuce with parmesan and croutons".into(),
            price: PerSize::new(7.99, 11.99),
            weight: PerSize::new("250g".into(), "400g".into()),
            image: "https://images.unsplash.com/photo-1550304943-4f24f54ddde9?q=80&w=1000&auto=format&fit=crop".into(),
            available: PerSize::new(20, 15),
        },
    ]
}
