//! Generated project files
//!
//! Gradle scripts are produced with the [`BlockComposer`]; the remaining
//! files are fixed text with the descriptor's values filled in. Every file
//! uses CRLF line endings.

use droidkit_android_toolchain::{ANDROID_GRADLE_PLUGIN, KOTLIN_VERSION};
use droidkit_core::composer::LINE_BREAK;
use droidkit_core::{BlockComposer, ComposeError, ProjectDescriptor};

/// Libraries every generated app module depends on
pub const APP_DEPENDENCIES: &[&str] = &[
    "androidx.core:core-ktx:1.7.0",
    "androidx.appcompat:appcompat:1.4.0",
    "com.google.android.material:material:1.4.0",
    "androidx.constraintlayout:constraintlayout:2.1.2",
    "androidx.work:work-runtime-ktx:2.7.1",
];

/// Activity declared in the generated manifest
pub const MAIN_ACTIVITY: &str = ".MainActivity";

/// Groovy single-quoted string literal
fn quoted(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}

/// Text safe inside a double-quoted XML attribute
fn xml_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn repositories(c: &mut BlockComposer) -> Result<(), ComposeError> {
    c.begin_block("repositories")
        .flag("google()")
        .flag("mavenCentral()");
    c.end_block()?;
    Ok(())
}

/// Root `build.gradle`
pub fn root_build_script() -> Result<String, ComposeError> {
    let mut c = BlockComposer::new();

    c.begin_block("buildscript")
        .assign("ext.kotlin_version", quoted(KOTLIN_VERSION));
    repositories(&mut c)?;
    c.begin_block("dependencies")
        .line(
            "classpath",
            quoted(&format!("com.android.tools.build:gradle:{}", ANDROID_GRADLE_PLUGIN)),
        )
        .line("classpath", "\"org.jetbrains.kotlin:kotlin-gradle-plugin:$kotlin_version\"");
    c.end_block()?.end_block()?;

    c.begin_block("allprojects");
    repositories(&mut c)?;
    c.end_block()?;

    c.begin_block("task clean(type: Delete)")
        .line("delete", "rootProject.buildDir");
    c.end_block()?;

    c.finish()
}

/// `app/build.gradle`
pub fn app_build_script(descriptor: &ProjectDescriptor) -> Result<String, ComposeError> {
    let mut c = BlockComposer::new();

    c.begin_block("plugins")
        .line("id", quoted("com.android.application"))
        .line("id", quoted("kotlin-android"));
    c.end_block()?;

    c.begin_block("android")
        .line("compileSdkVersion", descriptor.compile_sdk);

    c.begin_block("defaultConfig")
        .line("applicationId", quoted(&descriptor.worker_package()))
        .line("minSdkVersion", descriptor.min_sdk)
        .line("targetSdkVersion", descriptor.target_sdk)
        .line("versionCode", 1)
        .line("versionName", quoted("1.0"))
        .line("multiDexEnabled", true);
    c.end_block()?;

    c.begin_block("buildTypes")
        .begin_block("release")
        .line("minifyEnabled", false)
        .line(
            "proguardFiles",
            "getDefaultProguardFile('proguard-android-optimize.txt'), 'proguard-rules.pro'",
        );
    c.end_block()?;
    c.begin_block("debug")
        .line("debuggable", true);
    c.end_block()?.end_block()?;

    c.begin_block("compileOptions")
        .line("sourceCompatibility", "JavaVersion.VERSION_1_8")
        .line("targetCompatibility", "JavaVersion.VERSION_1_8");
    c.end_block()?;

    c.begin_block("kotlinOptions")
        .assign("jvmTarget", quoted("1.8"));
    c.end_block()?;

    c.begin_block("buildFeatures")
        .line("viewBinding", true);
    c.end_block()?.end_block()?;

    c.begin_block("dependencies")
        .line("implementation", "fileTree(dir: 'libs', include: ['*.jar'])")
        .line("implementation", "\"org.jetbrains.kotlin:kotlin-stdlib:$kotlin_version\"");
    for coordinate in APP_DEPENDENCIES {
        c.line("implementation", quoted(coordinate));
    }
    c.end_block()?;

    c.finish()
}

/// `settings.gradle`
pub fn settings_script(descriptor: &ProjectDescriptor) -> String {
    [
        format!("rootProject.name = {}", quoted(&descriptor.app_name)),
        "include ':app'".to_string(),
    ]
    .iter()
    .map(|line| format!("{}{}", line, LINE_BREAK))
    .collect()
}

/// `app/src/main/AndroidManifest.xml`
pub fn android_manifest(descriptor: &ProjectDescriptor) -> String {
    let lines = [
        r#"<?xml version="1.0" encoding="utf-8"?>"#.to_string(),
        r#"<manifest xmlns:android="http://schemas.android.com/apk/res/android""#.to_string(),
        format!(r#"    package="{}">"#, xml_attr(&descriptor.worker_package())),
        String::new(),
        "    <application".to_string(),
        r#"        android:allowBackup="true""#.to_string(),
        format!(r#"        android:label="{}""#, xml_attr(&descriptor.app_name)),
        r#"        android:supportsRtl="true">"#.to_string(),
        "        <activity".to_string(),
        format!(r#"            android:name="{}""#, MAIN_ACTIVITY),
        r#"            android:exported="true">"#.to_string(),
        "            <intent-filter>".to_string(),
        r#"                <action android:name="android.intent.action.MAIN" />"#.to_string(),
        r#"                <category android:name="android.intent.category.LAUNCHER" />"#.to_string(),
        "            </intent-filter>".to_string(),
        "        </activity>".to_string(),
        "    </application>".to_string(),
        "</manifest>".to_string(),
    ];
    lines.iter().map(|line| format!("{}{}", line, LINE_BREAK)).collect()
}

/// `app/.gitignore`
pub fn module_gitignore() -> String {
    ["/build", "*.iml", ".gradle", "/local.properties", ".cxx"]
        .iter()
        .map(|line| format!("{}{}", line, LINE_BREAK))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_build_script() {
        let script = root_build_script().unwrap();
        let expected = "buildscript {\r\n\
            \x20   ext.kotlin_version = '1.6.10'\r\n\
            \r\n\
            \x20   repositories {\r\n\
            \x20       google()\r\n\
            \x20       mavenCentral()\r\n\
            \x20   }\r\n\
            \r\n\
            \x20   dependencies {\r\n\
            \x20       classpath 'com.android.tools.build:gradle:7.0.4'\r\n\
            \x20       classpath \"org.jetbrains.kotlin:kotlin-gradle-plugin:$kotlin_version\"\r\n\
            \x20   }\r\n\
            }\r\n\
            \r\n\
            allprojects {\r\n\
            \r\n\
            \x20   repositories {\r\n\
            \x20       google()\r\n\
            \x20       mavenCentral()\r\n\
            \x20   }\r\n\
            }\r\n\
            \r\n\
            task clean(type: Delete) {\r\n\
            \x20   delete rootProject.buildDir\r\n\
            }\r\n";
        assert_eq!(script, expected);
    }

    #[test]
    fn test_app_build_script() {
        let descriptor = ProjectDescriptor::new("test", "com.test");
        let script = app_build_script(&descriptor).unwrap();

        assert!(script.starts_with("plugins {\r\n    id 'com.android.application'\r\n"));
        assert!(script.contains("\r\n        applicationId 'com.test.worker'\r\n"));
        assert!(script.contains("\r\n        minSdkVersion 19\r\n"));
        assert!(script.contains("\r\n        multiDexEnabled true\r\n"));
        assert!(script.contains("\r\n        jvmTarget = '1.8'\r\n"));
        // nested blocks at depth two get no separator
        assert!(script.contains("    buildTypes {\r\n        release {\r\n"));
        assert!(script.contains("        }\r\n        debug {\r\n"));
        for coordinate in APP_DEPENDENCIES {
            assert!(script.contains(&format!("    implementation '{}'\r\n", coordinate)));
        }
        assert_eq!(script.matches(" {\r\n").count(), script.matches("}\r\n").count());
    }

    #[test]
    fn test_settings_and_manifest() {
        let descriptor = ProjectDescriptor::new("test", "com.test");
        assert_eq!(
            settings_script(&descriptor),
            "rootProject.name = 'test'\r\ninclude ':app'\r\n"
        );

        let manifest = android_manifest(&descriptor);
        assert!(manifest.contains(r#"package="com.test.worker""#));
        assert_eq!(manifest.matches("<activity").count(), 1);
        assert!(!manifest.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_app_name_is_escaped() {
        let descriptor = ProjectDescriptor::new(r#"Tom's "A&B" <app>"#, "com.test");

        assert_eq!(
            settings_script(&descriptor),
            "rootProject.name = 'Tom\\'s \"A&B\" <app>'\r\ninclude ':app'\r\n"
        );

        let manifest = android_manifest(&descriptor);
        assert!(manifest.contains(
            r#"android:label="Tom&apos;s &quot;A&amp;B&quot; &lt;app&gt;""#
        ));
    }

    #[test]
    fn test_quoted_escapes_backslash() {
        assert_eq!(quoted(r"C:\dir"), r"'C:\\dir'");
        assert_eq!(quoted("plain"), "'plain'");
    }
}
