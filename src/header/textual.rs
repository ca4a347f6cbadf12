use super::Header;
use crate::utf8_b;
use std::fmt::{Display, Formatter, Result as FmtResult};

macro_rules! text_header {
    ( $type_name: ident, $header_name: expr ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $type_name(pub String);

        impl Header for $type_name {
            fn header_name() -> &'static str {
                $header_name
            }
        }

        impl Display for $type_name {
            fn fmt(&self, f: &mut Formatter) -> FmtResult {
                f.write_str(&utf8_b::encode(&self.0))
            }
        }
    };
}

text_header!(Subject, "Subject");
text_header!(XMailer, "X-Mailer");

#[cfg(test)]
mod test {
    use super::{Subject, XMailer};
    use crate::header::Headers;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_ascii() {
        let headers = Headers::new()
            .with(Subject("Sample subject".into()))
            .with(XMailer("emailcompose".into()));

        assert_eq!(
            format!("{}", headers),
            "Subject: Sample subject\r\nX-Mailer: emailcompose\r\n"
        );
    }

    #[test]
    fn format_utf8() {
        let headers = Headers::new().with(Subject("Тема сообщения".into()));

        assert_eq!(
            format!("{}", headers),
            "Subject: =?utf-8?b?0KLQtdC80LAg0YHQvtC+0LHRidC10L3QuNGP?=\r\n"
        );
    }
}
