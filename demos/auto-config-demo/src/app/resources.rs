//! 请求处理资源
//!
//! 资源以类型形式注册，宿主为每个请求创建实例

use auto_config::{discoverable, PATH};

/// 广告活动资源
#[derive(Debug, Default)]
pub struct CampaignResource;

impl CampaignResource {
    /// 挂载路径
    pub const ROUTE: &'static str = "/campaigns";
}

/// 创意素材资源
#[derive(Debug, Default)]
pub struct CreativeResource;

impl CreativeResource {
    /// 挂载路径
    pub const ROUTE: &'static str = "/creatives";
}

/// 根据类型名称查找挂载路径
pub fn route_of(type_name: &str) -> Option<&'static str> {
    match type_name {
        "CampaignResource" => Some(CampaignResource::ROUTE),
        "CreativeResource" => Some(CreativeResource::ROUTE),
        _ => None,
    }
}

discoverable!(Concrete CampaignResource, tags: [PATH]);
discoverable!(Concrete CreativeResource, tags: [PATH]);
