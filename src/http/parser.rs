use crate::http::request::{Request, parse_request_line};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed request line: {0}")]
    MalformedRequestLine(String),

    #[error("invalid header format: {0}")]
    InvalidHeaderFormat(String),

    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    #[error("body larger than Content-Length ({received} > {declared})")]
    BodyTooLarge { declared: usize, received: usize },

    #[error("incomplete request")]
    IncompleteRequest,

    #[error("already done parsing")]
    AlreadyDone,

    #[error("timed out waiting for request")]
    Timeout,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Progress of a [`Request`] through the incremental parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl Request {
    /// Consumes as much of `data` as currently forms complete tokens.
    ///
    /// Returns the number of bytes consumed. Bytes past that count were not
    /// looked at and must be offered again, with more data appended, on the
    /// next call. Never blocks.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.state == ParserState::Done {
            return Err(ParseError::AlreadyDone);
        }

        let mut total = 0;
        while self.state != ParserState::Done {
            let n = self.parse_single(&data[total..])?;
            if n == 0 {
                break;
            }
            total += n;
        }

        Ok(total)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::Initialized => match parse_request_line(data)? {
                None => Ok(0),
                Some((line, n)) => {
                    self.line = Some(line);
                    self.state = ParserState::ParsingHeaders;
                    Ok(n)
                }
            },

            ParserState::ParsingHeaders => {
                let (n, done) = self.headers.parse(data)?;
                if done {
                    self.finish_headers()?;
                }
                Ok(n)
            }

            ParserState::ParsingBody => {
                // Everything after the header section belongs to this body:
                // one request per connection, nothing pipelined behind it.
                self.body.extend_from_slice(data);

                if self.body.len() > self.content_length {
                    return Err(ParseError::BodyTooLarge {
                        declared: self.content_length,
                        received: self.body.len(),
                    });
                }

                if self.body.len() == self.content_length {
                    self.state = ParserState::Done;
                }

                Ok(data.len())
            }

            ParserState::Done => Err(ParseError::AlreadyDone),
        }
    }

    fn finish_headers(&mut self) -> Result<(), ParseError> {
        let Some(value) = self.headers.get("content-length") else {
            self.state = ParserState::Done;
            return Ok(());
        };

        let length = value
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?;

        // The body grows as bytes arrive; the declared length is untrusted.
        self.content_length = length;
        self.state = if length == 0 {
            ParserState::Done
        } else {
            ParserState::ParsingBody
        };

        Ok(())
    }
}
