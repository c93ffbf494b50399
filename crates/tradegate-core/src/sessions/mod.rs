mod clock;

pub use clock::{
    Overlap, SessionBoard, SessionClock, SessionId, SessionSchedule, SessionStatus, SessionWindow,
};
