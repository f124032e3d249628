/// `Job` is the unit of work producers hand to consumers.
///
/// It is tagged with the producer's name and a per-producer sequence
/// number, so drained jobs can always be traced back to where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Job {
    pub producer: String,
    pub sequence: u64,
    pub value: u32,
}

impl Job {
    #[must_use]
    pub fn new(producer: impl Into<String>, sequence: u64, value: u32) -> Self {
        Self {
            producer: producer.into(),
            sequence,
            value,
        }
    }
}

impl core::fmt::Display for Job {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#{}:{}", self.producer, self.sequence, self.value)
    }
}
