//! Build, runtime and bootstrap files of the server project

use super::java::{Annotation, JavaFile, Method, Statement, TypeDecl, TypeKind};
use super::layer_package;
use crate::core::naming::escape_java;
use crate::core::ProjectSettings;

const SPRINGDOC_VERSION: &str = "2.2.0";
const DB_USER: &str = "postgres";
const DB_PASSWORD: &str = "postgres";

pub fn pom_xml(settings: &ProjectSettings) -> String {
    let config = &settings.config;
    let artifact = settings.java_segment();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
    <modelVersion>4.0.0</modelVersion>

    <parent>
        <groupId>org.springframework.boot</groupId>
        <artifactId>spring-boot-starter-parent</artifactId>
        <version>{boot}</version>
        <relativePath/>
    </parent>

    <groupId>{group}</groupId>
    <artifactId>{artifact}</artifactId>
    <version>0.0.1-SNAPSHOT</version>
    <name>{artifact}</name>
    <description>Generated Spring Boot project from UML diagram</description>

    <properties>
        <java.version>{java}</java.version>
    </properties>

    <dependencies>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-data-jpa</artifactId>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-web</artifactId>
        </dependency>
        <dependency>
            <groupId>org.postgresql</groupId>
            <artifactId>postgresql</artifactId>
            <scope>runtime</scope>
        </dependency>
        <dependency>
            <groupId>org.projectlombok</groupId>
            <artifactId>lombok</artifactId>
            <optional>true</optional>
        </dependency>
        <dependency>
            <groupId>org.springdoc</groupId>
            <artifactId>springdoc-openapi-starter-webmvc-ui</artifactId>
            <version>{springdoc}</version>
        </dependency>
        <dependency>
            <groupId>org.springframework.boot</groupId>
            <artifactId>spring-boot-starter-test</artifactId>
            <scope>test</scope>
        </dependency>
    </dependencies>

    <build>
        <plugins>
            <plugin>
                <groupId>org.springframework.boot</groupId>
                <artifactId>spring-boot-maven-plugin</artifactId>
            </plugin>
        </plugins>
    </build>
</project>
"#,
        boot = config.spring_boot_version,
        group = settings.base_package,
        artifact = artifact,
        java = config.java_version,
        springdoc = SPRINGDOC_VERSION,
    )
}

pub fn application_properties(settings: &ProjectSettings) -> String {
    format!(
        r#"spring.application.name={name}
server.port={port}

# Database
spring.datasource.url=jdbc:postgresql://localhost:5432/{db}
spring.datasource.username={user}
spring.datasource.password={password}
spring.datasource.driver-class-name=org.postgresql.Driver

# JPA
spring.jpa.hibernate.ddl-auto=update
spring.jpa.show-sql=true
spring.jpa.properties.hibernate.format_sql=true
spring.jpa.properties.hibernate.dialect=org.hibernate.dialect.PostgreSQLDialect

# OpenAPI
springdoc.api-docs.path=/api-docs
springdoc.swagger-ui.path=/swagger-ui.html
"#,
        name = settings.java_segment(),
        port = settings.config.server_port,
        db = settings.database_name(),
        user = DB_USER,
        password = DB_PASSWORD,
    )
}

pub fn dockerfile(settings: &ProjectSettings) -> String {
    format!(
        r#"FROM openjdk:{java}-jdk-slim
WORKDIR /app
COPY target/*.jar app.jar
EXPOSE {port}
ENTRYPOINT ["java", "-jar", "app.jar"]
"#,
        java = settings.config.java_version,
        port = settings.config.server_port,
    )
}

pub fn docker_compose(settings: &ProjectSettings) -> String {
    format!(
        r#"version: '3.8'

services:
  postgres:
    image: postgres:15
    environment:
      POSTGRES_DB: {db}
      POSTGRES_USER: {user}
      POSTGRES_PASSWORD: {password}
    ports:
      - "5432:5432"
    volumes:
      - postgres_data:/var/lib/postgresql/data

  app:
    build: .
    ports:
      - "{port}:{port}"
    environment:
      SPRING_DATASOURCE_URL: jdbc:postgresql://postgres:5432/{db}
      SPRING_DATASOURCE_USERNAME: {user}
      SPRING_DATASOURCE_PASSWORD: {password}
    depends_on:
      - postgres

volumes:
  postgres_data:
"#,
        db = settings.database_name(),
        user = DB_USER,
        password = DB_PASSWORD,
        port = settings.config.server_port,
    )
}

pub fn swagger_config(settings: &ProjectSettings) -> JavaFile {
    let title = escape_java(&settings.project_name);
    let mut decl = TypeDecl::new(TypeKind::Class, "SwaggerConfig")
        .annotated(Annotation::marker("Configuration"));
    decl.method(
        Method::new(
            "public OpenAPI customOpenAPI()",
            vec![
                Statement::line("return new OpenAPI()"),
                Statement::line("        .info(new Info()"),
                Statement::line(format!("                .title(\"{} API\")", title)),
                Statement::line("                .version(\"1.0\")"),
                Statement::line(format!(
                    "                .description(\"API documentation for {}\"));",
                    title
                )),
            ],
        )
        .annotated(Annotation::marker("Bean")),
    );
    let mut file = JavaFile::new(layer_package(settings, "config"), decl);
    file.import("io.swagger.v3.oas.models.OpenAPI");
    file.import("io.swagger.v3.oas.models.info.Info");
    file.import("org.springframework.context.annotation.Bean");
    file.import("org.springframework.context.annotation.Configuration");
    file
}

pub fn application_class(settings: &ProjectSettings) -> JavaFile {
    let class = settings.application_class();
    let mut decl = TypeDecl::new(TypeKind::Class, &class)
        .annotated(Annotation::marker("SpringBootApplication"));
    decl.method(Method::new(
        "public static void main(String[] args)",
        vec![Statement::line(format!(
            "SpringApplication.run({}.class, args);",
            class
        ))],
    ));
    let mut file = JavaFile::new(settings.root_package(), decl);
    file.import("org.springframework.boot.SpringApplication");
    file.import("org.springframework.boot.autoconfigure.SpringBootApplication");
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GeneratorConfig;

    fn settings() -> ProjectSettings {
        ProjectSettings::new(
            "Pet Shop",
            "com.example",
            GeneratorConfig::default().with_server_port(9090),
        )
    }

    #[test]
    fn test_port_and_database_flow_into_runtime_files() {
        let s = settings();
        let props = application_properties(&s);
        assert!(props.contains("server.port=9090"));
        assert!(props.contains("jdbc:postgresql://localhost:5432/petshop_db"));
        assert!(dockerfile(&s).contains("EXPOSE 9090"));
        let compose = docker_compose(&s);
        assert!(compose.contains("\"9090:9090\""));
        assert!(compose.contains("POSTGRES_DB: petshop_db"));
    }

    #[test]
    fn test_pom_coordinates() {
        let pom = pom_xml(&settings());
        assert!(pom.contains("<groupId>com.example</groupId>"));
        assert!(pom.contains("<artifactId>petshop</artifactId>"));
        assert!(pom.contains("<version>3.2.0</version>"));
        assert!(pom.contains("<java.version>17</java.version>"));
    }

    #[test]
    fn test_bootstrap_classes() {
        let s = settings();
        let app = application_class(&s).render();
        assert!(app.starts_with("package com.example.petshop;\n"));
        assert!(app.contains("public class PetshopApplication {"));
        assert!(app.contains("SpringApplication.run(PetshopApplication.class, args);"));
        let swagger = swagger_config(&s).render();
        assert!(swagger.starts_with("package com.example.petshop.config;\n"));
        assert!(swagger.contains(".title(\"Pet Shop API\")"));
    }
}
