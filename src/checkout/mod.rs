mod services;

pub use services::{pay, MockWallet, PaymentGateway, PaymentReceipt};
