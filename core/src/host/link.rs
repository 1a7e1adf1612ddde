//! `LinkModule` call builders.
//!
//! Each method returns the `HostCall` the host must execute. Defaults the
//! container expects (selector options, share fields, location flags) are
//! merged in here, under whatever the caller supplied.

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::pages::{self, built_in, command, BuiltInPage, LaunchScript};
use super::{HostCall, Platform};
use crate::request::append_query;

/// One user id or a batch of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for UserLookup {
    fn from(id: &str) -> Self {
        UserLookup::One(id.to_string())
    }
}

impl From<Vec<String>> for UserLookup {
    fn from(ids: Vec<String>) -> Self {
        UserLookup::Many(ids)
    }
}

/// Parameters for launching another application from inside an app.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunApp {
    /// Code registered in the app market.
    pub app_code: String,
    /// Start page; script bundles (`...js`) also receive `data` as query pairs.
    pub app_url: Option<String>,
    /// Values the launched app reads back as page parameters.
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_drag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Where a PDF should be opened for the current platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfTarget {
    Host(HostCall),
    /// No native viewer; open a browser window.
    Window { url: String, title: String },
}

/// Builds calls against the `LinkModule` native module.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkApi {
    platform: Platform,
}

fn link(method: &str, args: Vec<Value>) -> HostCall {
    HostCall::link(method, args)
}

/// Overlay `overrides` on top of `defaults`, keeping default order first.
fn with_defaults(
    defaults: Vec<(&str, Value)>,
    overrides: Map<String, Value>,
) -> Map<String, Value> {
    let mut merged: Map<String, Value> = defaults
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    merged.extend(overrides);
    merged
}

fn opt(value: Option<&str>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}

impl LinkApi {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub fn get_login_info(&self) -> HostCall {
        link("getLoginInfo", vec![])
    }

    pub fn get_token(&self) -> HostCall {
        link("getToken", vec![])
    }

    pub fn refresh_token(&self) -> HostCall {
        link("refreshToken", vec![])
    }

    /// A batch lookup goes through `getUserListInfo`.
    pub fn get_user_info(&self, users: impl Into<UserLookup>) -> HostCall {
        match users.into() {
            UserLookup::One(id) => link("getUserInfo", vec![json!(id)]),
            UserLookup::Many(ids) => link("getUserListInfo", vec![json!(ids)]),
        }
    }

    pub fn get_user_id_with_login_id(&self, login_id: &str) -> HostCall {
        link("getUserIdWithLoginId", vec![json!(login_id)])
    }

    pub fn get_user_info_by_cellphone_or_email(&self, key: &str) -> HostCall {
        link("getUserInfoByCellphoneOrEmail", vec![json!(key)])
    }

    pub fn start_user_chat(
        &self,
        user_id: &str,
        user_name: Option<&str>,
        ecode: Option<&str>,
    ) -> HostCall {
        link("startUserChat", vec![json!(user_id), opt(user_name), opt(ecode)])
    }

    pub fn start_user_card(&self, user_id: &str) -> HostCall {
        link("startUserCard", vec![json!(user_id)])
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    pub fn create_group(&self, user_ids: &[String]) -> HostCall {
        built_in(BuiltInPage::CreateGroup, vec![("userSelected", json!(user_ids))])
    }

    pub fn join_group(&self, group_id: &str, user_ids: &[String]) -> HostCall {
        link("joinGroup", vec![json!(group_id), json!(user_ids)])
    }

    pub fn open_group_list(&self) -> HostCall {
        built_in(BuiltInPage::GroupList, vec![])
    }

    pub fn start_group_card(&self, group_id: &str) -> HostCall {
        link("startGroupCard", vec![json!(group_id)])
    }

    pub fn send_group_notice(&self, group_id: &str) -> HostCall {
        built_in(BuiltInPage::PublishGroupAnnouncement, vec![("groupId", json!(group_id))])
    }

    pub fn open_group_notice_list(&self, group_id: &str) -> HostCall {
        built_in(BuiltInPage::GroupAnnouncementList, vec![("groupId", json!(group_id))])
    }

    pub fn start_group_chat(&self, group_id: &str, group_name: &str) -> HostCall {
        link("startGroupChat", vec![json!(group_id), json!(group_name)])
    }

    pub fn open_group_bulletin_detail(&self, params: Value) -> HostCall {
        link("openGroupBulletinDetail", vec![params])
    }

    pub fn start_group_bulletin_edit(&self, params: Value) -> HostCall {
        link("startGroupBulletinEdit", vec![params])
    }

    // -----------------------------------------------------------------------
    // Organisations and service accounts
    // -----------------------------------------------------------------------

    /// Organisation tree, rooted at `org_id` when given.
    pub fn open_org_list(&self, org_id: Option<&str>) -> HostCall {
        built_in(BuiltInPage::OrganizationList, vec![("orgId", json!(org_id.unwrap_or("")))])
    }

    pub fn open_org_card(&self, org_id: &str) -> HostCall {
        built_in(BuiltInPage::OrganizationCard, vec![("orgId", json!(org_id))])
    }

    pub fn get_child_list_by_org_id(&self, org_id: &str, page: u32, page_size: u32) -> HostCall {
        link("getChildListByOrgId", vec![json!(org_id), json!(page), json!(page_size)])
    }

    pub fn get_dept_info_by_id(&self, org_id: &str) -> HostCall {
        link("getDeptInfoById", vec![json!(org_id)])
    }

    pub fn exec_sync_service(&self, sync_type: Value) -> HostCall {
        link("execSyncService", vec![sync_type])
    }

    pub fn send_service_account_notice(&self, account_id: &str, bulletin_type: Value) -> HostCall {
        built_in(
            BuiltInPage::SendBulletin,
            vec![("accountId", json!(account_id)), ("bulletinType", bulletin_type)],
        )
    }

    pub fn open_service_account_card(&self, account_id: &str) -> HostCall {
        built_in(BuiltInPage::ServiceAccountCard, vec![("accountId", json!(account_id))])
    }

    pub fn open_service_account_list(&self) -> HostCall {
        built_in(BuiltInPage::ServiceAccountList, vec![])
    }

    pub fn add_service_account(&self) -> HostCall {
        built_in(BuiltInPage::AddServiceAccount, vec![])
    }

    pub fn start_service_account_chat(&self, account_id: &str, account_name: &str) -> HostCall {
        link("startServiceAccountChat", vec![json!(account_id), json!(account_name)])
    }

    // -----------------------------------------------------------------------
    // Contacts and messages
    // -----------------------------------------------------------------------

    /// Single-choice contact picker. `data_type` selects users, groups,
    /// departments or service accounts as the container defines them.
    pub fn start_contact_single_selector(
        &self,
        title: &str,
        data_type: u8,
        extra: Map<String, Value>,
    ) -> HostCall {
        let extra = with_defaults(vec![("isIncludeDisableUser", json!(false))], extra);
        link(
            "startContactSingleSelector",
            vec![json!(title), json!(data_type), Value::Object(extra)],
        )
    }

    pub fn start_contact_multi_selector(
        &self,
        title: &str,
        data_type: u8,
        extra: Map<String, Value>,
    ) -> HostCall {
        let extra = with_defaults(
            vec![
                ("userSelected", json!([])),
                ("groupSelected", json!([])),
                ("organizationSelected", json!([])),
                ("userIgnore", json!([])),
                ("groupIgnore", json!([])),
                ("organizationIgnore", json!([])),
                ("isIncludeDisableUser", json!(false)),
            ],
            extra,
        );
        // The host registers the multi selector under this spelling.
        link(
            "startContactMulitSelector",
            vec![json!(title), json!(data_type), Value::Object(extra)],
        )
    }

    pub fn open_contact_page(&self) -> HostCall {
        built_in(BuiltInPage::Contact, vec![])
    }

    pub fn open_msg_center(&self) -> HostCall {
        built_in(BuiltInPage::MessageCenter, vec![])
    }

    pub fn get_unread_message_count(&self) -> HostCall {
        link("getUnreadMessageCount", vec![])
    }

    /// `talk_with_id` may name a user, service account, department or group.
    pub fn get_unread_message_count_by_id(&self, talk_with_id: &str) -> HostCall {
        link("getUnreadMessageCountById", vec![json!(talk_with_id)])
    }

    pub fn send_invite_message(&self, params: Option<Map<String, Value>>) -> HostCall {
        link("sendInviteMessage", vec![Value::Object(params.unwrap_or_default())])
    }

    // -----------------------------------------------------------------------
    // Microblogs
    // -----------------------------------------------------------------------

    pub fn publish_microblog(&self, options: Map<String, Value>) -> HostCall {
        let params = with_defaults(
            vec![
                ("code", json!(pages::OPEN_BUILT_IN)),
                ("key", json!(BuiltInPage::PublishMicroBlog.key())),
            ],
            options,
        );
        pages::dictionary(params)
    }

    pub fn open_user_microblog(&self, user_id: &str) -> HostCall {
        built_in(BuiltInPage::BlogCard, vec![("accountId", json!(user_id))])
    }

    pub fn open_group_microblog(&self, group_id: &str) -> HostCall {
        built_in(BuiltInPage::GroupBlogList, vec![("groupId", json!(group_id))])
    }

    pub fn open_service_account_microblog(&self, service_id: &str) -> HostCall {
        built_in(
            BuiltInPage::BlogCard,
            vec![("accountId", json!(service_id)), ("accountType", json!(3))],
        )
    }

    pub fn open_topic_microblog(&self, topic: &str) -> HostCall {
        built_in(BuiltInPage::TopicBlogList, vec![("topic", json!(topic))])
    }

    pub fn open_microblog_detail(&self, blog_id: &str) -> HostCall {
        built_in(BuiltInPage::BlogDetail, vec![("blogId", json!(blog_id))])
    }

    pub fn open_my_microblog(&self) -> HostCall {
        built_in(BuiltInPage::MyMicroBlog, vec![])
    }

    pub fn start_project_detail(&self, project_id: &str) -> HostCall {
        link("startProjectDetail", vec![json!(project_id)])
    }

    // -----------------------------------------------------------------------
    // Applications, check-in and location
    // -----------------------------------------------------------------------

    pub fn run_app(&self, app: &RunApp) -> HostCall {
        let mut script = LaunchScript::new("OpenApp").entry("appCode", app.app_code.as_str());
        if let Some(app_url) = &app.app_url {
            let mut url = app_url.clone();
            if app_url.ends_with("js") && !app.data.is_empty() {
                let pairs: Vec<(String, String)> = app
                    .data
                    .iter()
                    .map(|(k, v)| (k.clone(), crate::request::render_value(v)))
                    .collect();
                append_query(&mut url, &pairs);
            }
            script = script.entry("appUrl", url);
        }
        for (key, value) in &app.data {
            script = script.entry(key.as_str(), crate::request::render_value(value));
        }
        script.into_call()
    }

    pub fn open_app_market(&self) -> HostCall {
        built_in(BuiltInPage::DcService, vec![])
    }

    pub fn get_favorite_app(&self) -> HostCall {
        command("Data", Some("GetFavoriteService"), vec![])
    }

    pub fn start_check_in(&self) -> HostCall {
        LaunchScript::new("StartCheckin")
            .entry("pushToListOnComplete", "false")
            .into_call()
    }

    pub fn open_check_in_list(&self) -> HostCall {
        LaunchScript::new(pages::OPEN_BUILT_IN)
            .entry("key", "MyCheckIn")
            .into_call()
    }

    pub fn open_check_in_detail(&self, checkin_id: &str) -> HostCall {
        built_in(BuiltInPage::CheckinDetail, vec![("checkinId", json!(checkin_id))])
    }

    /// Location picker. Dragging defaults to off and search to on; explicit
    /// values are kept as given.
    pub fn start_location_select(&self, options: &LocationOptions) -> HostCall {
        let mut params = Map::new();
        params.insert("canDrag".to_string(), json!(options.can_drag.unwrap_or(false)));
        params.insert("canSearch".to_string(), json!(options.can_search.unwrap_or(true)));
        if let Some(title) = &options.title {
            params.insert("title".to_string(), json!(title));
        }
        link("startLocationSelect", vec![Value::Object(params)])
    }

    // -----------------------------------------------------------------------
    // Personal pages, settings and processes
    // -----------------------------------------------------------------------

    /// Any built-in page that takes no parameters (settings pages, about,
    /// video capture, scanning and so on).
    pub fn open_page(&self, page: BuiltInPage) -> HostCall {
        built_in(page, vec![])
    }

    pub fn open_setting(&self) -> HostCall {
        command("OpenSubMenu", Some("setting"), vec![("module", json!("MySelf"))])
    }

    pub fn logout(&self) -> HostCall {
        self.open_page(BuiltInPage::StLogout)
    }

    pub fn check_gesture_lock(&self) -> HostCall {
        self.open_page(BuiltInPage::CheckGestureLock)
    }

    pub fn start_process(&self, process_id: &str, service_name: &str) -> HostCall {
        command(
            "OpenProcess",
            None,
            vec![("processId", json!(process_id)), ("serviceName", json!(service_name))],
        )
    }

    pub fn open_process_mywork(&self) -> HostCall {
        self.open_page(BuiltInPage::MyWork)
    }

    // -----------------------------------------------------------------------
    // Sharing
    // -----------------------------------------------------------------------

    pub fn share(&self, params: Map<String, Value>) -> HostCall {
        link("share", vec![Value::Object(share_params(params))])
    }

    pub fn share_to_message(&self, params: Map<String, Value>) -> HostCall {
        link("shareToMessage", vec![Value::Object(share_params(params))])
    }

    pub fn share_to_blog(&self, params: Map<String, Value>) -> HostCall {
        link("shareToBlog", vec![Value::Object(share_params(params))])
    }

    // -----------------------------------------------------------------------
    // Cloud disk and files
    // -----------------------------------------------------------------------

    pub fn choose_disk_file(&self) -> HostCall {
        link("chooseDiskFile", vec![])
    }

    pub fn create_disk_file_share(&self, file_id: &str) -> HostCall {
        link("createDiskFileShare", vec![json!(file_id)])
    }

    pub fn open_disk_file_detail(&self, file_id: &str, share_info: Value) -> HostCall {
        link("openDiskFileDetail", vec![json!(file_id), share_info])
    }

    pub fn choose_file(&self) -> HostCall {
        link("chooseFile", vec![])
    }

    /// `source`: 0 camera, 1 pictures, 2 local files, 3 cloud disk.
    pub fn select_files(&self, source: u8) -> HostCall {
        link("selectResourceFiles", vec![json!(source)])
    }

    /// Upload resources previously returned by `select_files`. The host takes
    /// the resource list itself as the argument array.
    pub fn upload_files(&self, resources: Vec<Value>) -> HostCall {
        link("uploadResourceFiles", resources)
    }

    pub fn open_file(&self, resource: Value) -> HostCall {
        link("openResourceFile", vec![resource])
    }

    // -----------------------------------------------------------------------
    // Browsers
    // -----------------------------------------------------------------------

    pub fn open_link_browser(&self, title: &str, url: &str) -> HostCall {
        command("OpenUrl", None, vec![("title", json!(title)), ("url", json!(url))])
    }

    pub fn open_bt_browser(&self, url: &str) -> HostCall {
        LaunchScript::new("BingoTouch").entry("url", url).into_call()
    }

    pub fn open_pdf(&self, title: &str, url: &str) -> PdfTarget {
        match self.platform {
            Platform::Android => PdfTarget::Host(link(
                "fileBrowse",
                vec![json!({"name": title, "uri": url})],
            )),
            Platform::Ios => PdfTarget::Host(self.open_link_browser(title, url)),
            Platform::Web => PdfTarget::Window {
                url: url.to_string(),
                title: title.to_string(),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    pub fn update_tab_badge(&self, badge: Value) -> HostCall {
        link("updateTabBadge", vec![badge])
    }

    pub fn get_theme_color(&self) -> HostCall {
        link("getThemeColor", vec![])
    }

    pub fn scan_code(&self, options: Option<Value>) -> HostCall {
        match options {
            Some(options) => link("scanCode", vec![options]),
            None => self.open_page(BuiltInPage::ScanCode),
        }
    }

    pub fn get_language(&self) -> HostCall {
        link("getLanguage", vec![])
    }

    pub fn register_receiver(&self, key: &str) -> HostCall {
        link("registerReceiver", vec![json!(key)])
    }

    pub fn update_message_tab_badge(&self, app_code: &str, unread_count: u32) -> HostCall {
        link(
            "updateMessageTabBadge",
            vec![json!({"appCode": app_code, "unReadCount": unread_count})],
        )
    }

    pub fn send_exit_event(&self, app_code: &str) -> HostCall {
        link("sendExitEvent", vec![json!(app_code)])
    }
}

/// Share defaults: empty title and content. Picture shares use the content
/// (the picture address) as the icon.
fn share_params(params: Map<String, Value>) -> Map<String, Value> {
    let mut params = with_defaults(vec![("content", json!("")), ("title", json!(""))], params);
    if params.get("type").and_then(Value::as_str) == Some("picture") {
        let content = params.get("content").cloned().unwrap_or(Value::Null);
        params.insert("icon".to_string(), content);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> LinkApi {
        LinkApi::new(Platform::Android)
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn user_info_single_and_batch() {
        let one = api().get_user_info("u1");
        assert_eq!(one.method, "getUserInfo");
        assert_eq!(one.payload, json!(["u1"]));

        let many = api().get_user_info(vec!["u1".to_string(), "u2".to_string()]);
        assert_eq!(many.method, "getUserListInfo");
        assert_eq!(many.payload, json!([["u1", "u2"]]));
    }

    #[test]
    fn user_chat_passes_missing_names_as_null() {
        let call = api().start_user_chat("u1", None, Some("corp"));
        assert_eq!(call.payload, json!(["u1", null, "corp"]));
    }

    #[test]
    fn create_group_uses_built_in_dictionary() {
        let call = api().create_group(&["u1".to_string()]);
        assert_eq!(
            call.payload,
            json!([{"code": "OpenBuiltIn", "key": "CreateGroup", "userSelected": ["u1"]}])
        );
    }

    #[test]
    fn org_list_defaults_to_empty_root() {
        let call = api().open_org_list(None);
        assert_eq!(call.payload[0]["orgId"], "");
    }

    #[test]
    fn multi_selector_merges_caller_extras_over_defaults() {
        let call = api().start_contact_multi_selector(
            "Pick",
            1,
            object(json!({"userSelected": ["u9"], "maxCount": 5})),
        );
        assert_eq!(call.method, "startContactMulitSelector");
        let extra = &call.payload[2];
        assert_eq!(extra["userSelected"], json!(["u9"]));
        assert_eq!(extra["groupIgnore"], json!([]));
        assert_eq!(extra["isIncludeDisableUser"], false);
        assert_eq!(extra["maxCount"], 5);
    }

    #[test]
    fn single_selector_default_can_be_overridden() {
        let call = api().start_contact_single_selector(
            "Pick",
            4,
            object(json!({"isIncludeDisableUser": true})),
        );
        assert_eq!(call.payload, json!(["Pick", 4, {"isIncludeDisableUser": true}]));
    }

    #[test]
    fn publish_microblog_lets_options_extend_command() {
        let call = api().publish_microblog(object(json!({"content": "hello", "privateType": 4})));
        assert_eq!(
            call.payload,
            json!([{
                "code": "OpenBuiltIn",
                "key": "PublishMicroBlog",
                "content": "hello",
                "privateType": 4
            }])
        );
    }

    #[test]
    fn service_account_microblog_sets_account_type() {
        let call = api().open_service_account_microblog("svc");
        assert_eq!(call.payload[0]["accountType"], 3);
        assert_eq!(call.payload[0]["key"], "BlogCard");
    }

    #[test]
    fn run_app_script_bundle_gets_query_pairs() {
        let app = RunApp {
            app_code: "news".to_string(),
            app_url: Some("http://h/app/index.js".to_string()),
            data: object(json!({"a": "x y", "n": 2})),
        };
        let call = api().run_app(&app);
        assert_eq!(call.method, "launchLinkService");
        assert_eq!(
            call.payload,
            json!(["[OpenApp]\nappCode=news\nappUrl=http://h/app/index.js?a=x%20y&n=2\na=x y\nn=2"])
        );
    }

    #[test]
    fn run_app_web_page_keeps_url() {
        let app = RunApp {
            app_code: "portal".to_string(),
            app_url: Some("http://h/index.html".to_string()),
            data: object(json!({"tab": "home"})),
        };
        let call = api().run_app(&app);
        assert_eq!(
            call.payload,
            json!(["[OpenApp]\nappCode=portal\nappUrl=http://h/index.html\ntab=home"])
        );
    }

    #[test]
    fn run_app_without_url() {
        let app = RunApp {
            app_code: "mail".to_string(),
            ..RunApp::default()
        };
        assert_eq!(api().run_app(&app).payload, json!(["[OpenApp]\nappCode=mail"]));
    }

    #[test]
    fn check_in_scripts() {
        assert_eq!(
            api().start_check_in().payload,
            json!(["[StartCheckin]\npushToListOnComplete=false"])
        );
        assert_eq!(
            api().open_check_in_list().payload,
            json!(["[OpenBuiltIn]\nkey=MyCheckIn"])
        );
    }

    #[test]
    fn location_select_defaults_only_fill_missing_flags() {
        let call = api().start_location_select(&LocationOptions::default());
        assert_eq!(call.payload, json!([{"canDrag": false, "canSearch": true}]));

        let call = api().start_location_select(&LocationOptions {
            can_search: Some(false),
            title: Some("Where".to_string()),
            ..LocationOptions::default()
        });
        assert_eq!(
            call.payload,
            json!([{"canDrag": false, "canSearch": false, "title": "Where"}])
        );
    }

    #[test]
    fn settings_submenu() {
        assert_eq!(
            api().open_setting().payload,
            json!([{"code": "OpenSubMenu", "key": "setting", "module": "MySelf"}])
        );
    }

    #[test]
    fn process_command_has_no_key() {
        let call = api().start_process("p1", "Leave");
        assert_eq!(
            call.payload,
            json!([{"code": "OpenProcess", "processId": "p1", "serviceName": "Leave"}])
        );
    }

    #[test]
    fn picture_share_copies_content_into_icon() {
        let call = api().share(object(json!({"type": "picture", "content": "http://img/1.png"})));
        let params = &call.payload[0];
        assert_eq!(params["icon"], "http://img/1.png");
        assert_eq!(params["title"], "");
    }

    #[test]
    fn share_defaults_fill_title_and_content() {
        let call = api().share_to_blog(object(json!({"type": "website", "url": "http://x"})));
        assert_eq!(call.method, "shareToBlog");
        assert_eq!(call.payload[0]["content"], "");
        assert!(call.payload[0].get("icon").is_none());
    }

    #[test]
    fn upload_passes_resources_as_arguments() {
        let call = api().upload_files(vec![json!({"id": "r1"}), json!({"id": "r2"})]);
        assert_eq!(call.payload, json!([{"id": "r1"}, {"id": "r2"}]));
    }

    #[test]
    fn pdf_target_depends_on_platform() {
        match LinkApi::new(Platform::Android).open_pdf("Report", "file:///r.pdf") {
            PdfTarget::Host(call) => {
                assert_eq!(call.method, "fileBrowse");
                assert_eq!(call.payload, json!([{"name": "Report", "uri": "file:///r.pdf"}]));
            }
            other => panic!("unexpected target {other:?}"),
        }
        match LinkApi::new(Platform::Ios).open_pdf("Report", "http://r.pdf") {
            PdfTarget::Host(call) => assert_eq!(call.payload[0]["code"], "OpenUrl"),
            other => panic!("unexpected target {other:?}"),
        }
        assert_eq!(
            LinkApi::new(Platform::Web).open_pdf("Report", "http://r.pdf"),
            PdfTarget::Window {
                url: "http://r.pdf".to_string(),
                title: "Report".to_string()
            }
        );
    }

    #[test]
    fn scan_code_with_and_without_options() {
        assert_eq!(api().scan_code(None).payload[0]["key"], "ScanCode");
        let call = api().scan_code(Some(json!({"isHandleResult": true})));
        assert_eq!(call.method, "scanCode");
    }

    #[test]
    fn bt_browser_script() {
        assert_eq!(
            api().open_bt_browser("http://bt/app").payload,
            json!(["[BingoTouch]\nurl=http://bt/app"])
        );
    }

    #[test]
    fn message_tab_badge_payload() {
        let call = api().update_message_tab_badge("businesscenter", 3);
        assert_eq!(call.payload, json!([{"appCode": "businesscenter", "unReadCount": 3}]));
    }
}
