use serde_derive::{Serialize, Deserialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FeedResponse {
    pub data: Vec<UpdateRecord>
}
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateRecord {
    pub update: String
}

impl UpdateRecord {
    pub fn new(update: impl Into<String>) -> Self {
        UpdateRecord { update: update.into() }
    }
}
