//! 属性源抽象接口

use std::fmt::Debug;

/// 属性源 trait
/// 
/// 读取永不失败：无法读取的属性按不存在处理。
pub trait PropertySource: Send + Sync + Debug {
    /// 获取属性值
    fn get_property(&self, key: &str) -> Option<String>;
    
    /// 检查属性是否存在
    fn contains_property(&self, key: &str) -> bool {
        self.get_property(key).is_some()
    }
    
    /// 获取所有可枚举的属性键
    fn property_names(&self) -> Vec<String>;
    
    /// 获取属性源名称
    fn name(&self) -> &str;
}

/// 可写属性源 trait
pub trait MutablePropertySource: PropertySource {
    /// 设置属性值
    fn set_property(&mut self, key: &str, value: String);
    
    /// 移除属性，返回旧值
    fn remove_property(&mut self, key: &str) -> Option<String>;
    
    /// 清空所有属性
    fn clear(&mut self);
}

/// 解析布尔标志，仅 "true"（大小写不敏感）为真
pub fn parse_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(Some("true")));
        assert!(parse_flag(Some("TRUE")));
        assert!(!parse_flag(Some("yes")));
        assert!(!parse_flag(None));
    }
}
