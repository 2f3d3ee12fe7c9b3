//! User-facing strings in English and Arabic

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Lang
// ---------------------------------------------------------------------------

/// Interface language. English unless the request asks for Arabic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl Lang {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ar => "ar",
        }
    }

    /// Parse a language tag such as `ar`, `ar-EG` or `en-US`.
    /// Anything that is not Arabic falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag
            .trim()
            .split(|c: char| c == '-' || c == '_')
            .next()
            .unwrap_or_default();
        if primary.eq_ignore_ascii_case("ar") {
            Lang::Ar
        } else {
            Lang::En
        }
    }

    /// Pick the language from an `Accept-Language` header value.
    /// Only the first-ranked entry is considered.
    pub fn from_accept_language(header: &str) -> Self {
        header
            .split(',')
            .next()
            .map(|entry| entry.split(';').next().unwrap_or_default())
            .map(Lang::from_tag)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Lang::En => "English",
            Lang::Ar => "العربية",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Registered,
    LoggedIn,
    LoggedOut,
    BookAdded,
    CopiesAdded,
    BookReserved,
    BookingReturned,
    BookingAlreadyReturned,
    LoginRequired,
    NotFound,
    NoCopiesAvailable,
    NotAllowed,
    UsernameTaken,
    WrongCredentials,
    InvalidInput,
    ServerError,
}

impl Message {
    pub fn text(self, lang: Lang) -> &'static str {
        match lang {
            Lang::En => self.english(),
            Lang::Ar => self.arabic(),
        }
    }

    fn english(self) -> &'static str {
        match self {
            Message::Registered => "Registered successfully. You can login now.",
            Message::LoggedIn => "Logged in",
            Message::LoggedOut => "Logged out",
            Message::BookAdded => "Book added",
            Message::CopiesAdded => "Copies added",
            Message::BookReserved => "Book reserved",
            Message::BookingReturned => "Booking returned",
            Message::BookingAlreadyReturned => "Booking was already returned",
            Message::LoginRequired => "Please login first",
            Message::NotFound => "Not found",
            Message::NoCopiesAvailable => "No copies available right now",
            Message::NotAllowed => "Not allowed",
            Message::UsernameTaken => "Username already exists",
            Message::WrongCredentials => "Wrong username or password",
            Message::InvalidInput => "Invalid input",
            Message::ServerError => "Internal server error",
        }
    }

    fn arabic(self) -> &'static str {
        match self {
            Message::Registered => "تم التسجيل، دلوقتي تقدر تعمل تسجيل دخول",
            Message::LoggedIn => "تم تسجيل الدخول",
            Message::LoggedOut => "تم تسجيل الخروج",
            Message::BookAdded => "تم إضافة الكتاب",
            Message::CopiesAdded => "تم إضافة النسخ",
            Message::BookReserved => "تم حجز الكتاب",
            Message::BookingReturned => "تمت إعادة الكتاب",
            Message::BookingAlreadyReturned => "الكتاب اترجع قبل كده",
            Message::LoginRequired => "اعمل تسجيل دخول الأول",
            Message::NotFound => "مش موجود",
            Message::NoCopiesAvailable => "مافيش نسخ متاحة دلوقتي",
            Message::NotAllowed => "غير مسموح",
            Message::UsernameTaken => "اليوزر موجود بالفعل",
            Message::WrongCredentials => "خطأ في اليوزر أو الباسورد",
            Message::InvalidInput => "البيانات غير صحيحة",
            Message::ServerError => "حصل خطأ في السيرفر",
        }
    }
}
