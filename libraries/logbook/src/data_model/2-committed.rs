//! # Committed
//! An event once it is in the log. `commit` is the number of the transaction that appended it (the first commit is 1),
//! `position` is its index in the log. Every event of one commit shares the same `commit` and `timestamp`.

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Committed<E> {
    pub commit: u64,
    pub position: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub event: E,
}

impl<E> Committed<E> {
    pub fn map<G, F: FnOnce(E) -> G>(self, f: F) -> Committed<G> {
        Committed {
            commit: self.commit,
            position: self.position,
            timestamp: self.timestamp,
            event: f(self.event),
        }
    }

    pub fn as_ref(&self) -> Committed<&E> {
        Committed {
            commit: self.commit,
            position: self.position,
            timestamp: self.timestamp,
            event: &self.event,
        }
    }
}

impl<E, Error> Committed<Result<E, Error>> {
    pub fn transpose(self) -> Result<Committed<E>, Error> {
        let Committed {
            commit,
            position,
            timestamp,
            event,
        } = self;
        event.map(|event| Committed {
            commit,
            position,
            timestamp,
            event,
        })
    }
}

impl<E: crate::Event> Committed<E> {
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let c = self.as_ref().map(|e| e.to_json()).transpose()?;
        serde_json::to_value(&c)
    }

    pub fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        let c = serde_json::from_value::<Committed<serde_json::Value>>(json.clone())?;
        c.map(|e| E::from_json(&e)).transpose()
    }
}
