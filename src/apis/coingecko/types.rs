use std::collections::HashMap;

/// Response shape of /simple/price: `{ "<asset_id>": { "<currency>": 3.21 } }`
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;
