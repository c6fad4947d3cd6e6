// Procurement: duplicate-safe Purchase Order creation from quotation selections
pub mod procurement;
