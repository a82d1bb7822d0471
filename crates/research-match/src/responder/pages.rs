use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Fixed pages shown for request failures. Neither page carries failure detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    NotFound,
    Internal,
}

impl ErrorPage {
    pub const fn status(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::NotFound => "File Not Found",
            Self::Internal => "An unexpected error has occurred",
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "The page you requested does not exist.",
            Self::Internal => {
                "The administrator has been notified. Sorry for the inconvenience!"
            }
        }
    }

    pub fn render(self) -> Html<String> {
        Html(format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Back</a></p>\n</body>\n</html>\n",
            title = self.title(),
            message = self.message(),
        ))
    }
}

impl IntoResponse for ErrorPage {
    fn into_response(self) -> Response {
        (self.status(), self.render()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pages_render_with_their_status() {
        let response = ErrorPage::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .expect("read body");
        let html = String::from_utf8(body.to_vec()).expect("utf8 body");
        assert!(html.contains("File Not Found"));
    }

    #[test]
    fn internal_page_is_generic() {
        assert_eq!(
            ErrorPage::Internal.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert!(!ErrorPage::Internal.render().0.contains("error:"));
    }
}
