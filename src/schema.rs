//! Sheet names and column layouts.
//!
//! The backing spreadsheet has a fixed shape: writes address columns by
//! position, reads go through the header row. Indices are 0-based.

/// Name of the process-wide lock serializing check-then-append sequences.
pub const CELLAR_LOCK: &str = "cellar";

pub mod wines {
    pub const SHEET: &str = "Wines";

    pub const COL_WINE_ID: usize = 0;
    pub const COL_NAME: usize = 1;
    pub const COL_WINERY: usize = 2;
    pub const COL_REGION: usize = 3;
    pub const COL_COUNTRY: usize = 4;
    pub const COL_VINTAGE: usize = 5;
    pub const COL_COLOR: usize = 6;
    pub const COL_GRAPES: usize = 7;
    pub const COL_STYLE: usize = 8;
    pub const COL_SWEETNESS: usize = 9;
    pub const COL_ALCOHOL: usize = 10;
    pub const COL_DRINK_FROM: usize = 11;
    pub const COL_DRINK_UNTIL: usize = 12;
    pub const COL_FOOD_PAIRING: usize = 13;
    pub const COL_OCCASION: usize = 14;
    pub const COL_PRICE: usize = 15;
    pub const COL_BOTTLE_SIZE: usize = 16;
    pub const COL_STORAGE_LOCATION: usize = 17;
    pub const COL_NOTES: usize = 18;

    pub const HEADER: [&str; 19] = [
        "WineID",
        "Name",
        "Winery",
        "Region",
        "Country",
        "Vintage",
        "Color",
        "Grapes",
        "Style",
        "Sweetness",
        "Alcohol",
        "DrinkFrom",
        "DrinkUntil",
        "FoodPairing",
        "Occasion",
        "Price",
        "BottleSize",
        "StorageLocation",
        "Notes",
    ];
}

pub mod transactions {
    pub const SHEET: &str = "Transactions";

    pub const COL_TRANSACTION_ID: usize = 0;
    pub const COL_DATE: usize = 1;
    pub const COL_WINE_ID: usize = 2;
    pub const COL_QUANTITY: usize = 3;
    pub const COL_TYPE: usize = 4;
    pub const COL_REASON: usize = 5;
    pub const COL_PERSON: usize = 6;
    pub const COL_COMMENT: usize = 7;

    pub const HEADER: [&str; 8] = [
        "TransactionID",
        "Date",
        "WineID",
        "Quantity",
        "Type",
        "Reason",
        "Person",
        "Comment",
    ];
}

pub mod inventory {
    pub const SHEET: &str = "Inventory";

    pub const COL_WINE_ID: usize = 0;

    pub const HEADER: [&str; 10] = [
        "WineID",
        "Name",
        "Winery",
        "Vintage",
        "Color",
        "StorageLocation",
        "CurrentStock",
        "LastTransactionDate",
        "IsDrinkableNow",
        "DrinkSoon",
    ];
}

pub mod statistics {
    pub const SHEET: &str = "Statistics";

    pub const COL_KEY: usize = 0;
    pub const COL_VALUE: usize = 1;

    pub const HEADER: [&str; 3] = ["Key", "Value", "Comment"];
}
