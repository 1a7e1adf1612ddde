//! Built-in container pages and launch scripts.
//!
//! Most navigation goes through `launchLinkServiceWithDictionary` with a
//! `{code, key, ...}` dictionary. A few older entry points take a launch
//! script instead: a `[Section]` header followed by `key=value` lines,
//! passed to `launchLinkService`.

use serde_json::{Map, Value};

use super::HostCall;

pub const OPEN_BUILT_IN: &str = "OpenBuiltIn";

macro_rules! built_in_pages {
    ($($page:ident),* $(,)?) => {
        /// Pages the container can open by key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum BuiltInPage {
            $($page),*
        }

        impl BuiltInPage {
            pub fn key(self) -> &'static str {
                match self {
                    $(BuiltInPage::$page => stringify!($page)),*
                }
            }
        }
    };
}

built_in_pages! {
    CreateGroup,
    GroupList,
    PublishGroupAnnouncement,
    GroupAnnouncementList,
    OrganizationList,
    OrganizationCard,
    SendBulletin,
    ServiceAccountCard,
    ServiceAccountList,
    AddServiceAccount,
    Contact,
    MessageCenter,
    PublishMicroBlog,
    BlogCard,
    GroupBlogList,
    TopicBlogList,
    BlogDetail,
    MyMicroBlog,
    DcService,
    CheckinDetail,
    EditPersonInfo,
    MyAbout,
    StNotification,
    StGestureLock,
    CheckGestureLock,
    StFont,
    StDevice,
    StSync,
    StCleanCache,
    StModifyPassword,
    InviteUser,
    StQrcode,
    StLogout,
    MyWork,
    VideoCapture,
    ScanCode,
}

/// `launchLinkServiceWithDictionary` call for an arbitrary dictionary.
pub fn dictionary(entries: Map<String, Value>) -> HostCall {
    HostCall::link("launchLinkServiceWithDictionary", vec![Value::Object(entries)])
}

/// Dictionary with `code` and `key`, followed by `extras` in order.
pub fn command(code: &str, key: Option<&str>, extras: Vec<(&str, Value)>) -> HostCall {
    let mut entries = Map::new();
    entries.insert("code".to_string(), Value::from(code));
    if let Some(key) = key {
        entries.insert("key".to_string(), Value::from(key));
    }
    for (name, value) in extras {
        entries.insert(name.to_string(), value);
    }
    dictionary(entries)
}

/// Open a built-in page with additional dictionary entries.
pub fn built_in(page: BuiltInPage, extras: Vec<(&str, Value)>) -> HostCall {
    command(OPEN_BUILT_IN, Some(page.key()), extras)
}

/// A `[Section]` launch script for `launchLinkService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchScript {
    section: String,
    entries: Vec<(String, String)>,
}

impl LaunchScript {
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn render(&self) -> String {
        let mut script = format!("[{}]", self.section);
        for (key, value) in &self.entries {
            script.push('\n');
            script.push_str(key);
            script.push('=');
            script.push_str(value);
        }
        script
    }

    pub fn into_call(self) -> HostCall {
        HostCall::link("launchLinkService", vec![Value::String(self.render())])
    }
}
