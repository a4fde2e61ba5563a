/// Status codes the engine uses itself plus a custom escape hatch
///
/// The engine only ever emits a handful of codes on its own (200, 206,
/// 403, 404, 502); everything else can be sent with `Status::Raw`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,                     // 200
    PartialContent,         // 206
    BadRequest,             // 400
    Forbidden,              // 403
    NotFound,               // 404
    InternalServerError,    // 500
    BadGateway,             // 502
    /// A custom status line: numeric code and reason phrase
    Raw(u16, String),
}

impl Status {
    pub fn code(&self) -> u16 {
        match *self {
            Status::Ok => 200,
            Status::PartialContent => 206,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::InternalServerError => 500,
            Status::BadGateway => 502,
            Status::Raw(code, _) => code,
        }
    }

    pub fn reason(&self) -> &str {
        match *self {
            Status::Ok => "OK",
            Status::PartialContent => "Partial Content",
            Status::BadRequest => "Bad Request",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::InternalServerError => "Internal Server Error",
            Status::BadGateway => "Bad Gateway",
            Status::Raw(_, ref reason) => reason,
        }
    }
}
